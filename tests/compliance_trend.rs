use water_stability_toolbox::water::compliance::{
    check_compliance, check_parameter, suggested_action, WITHIN_TARGET,
};
use water_stability_toolbox::water::trend::{analyze_trend, trend_status, TrendDirection, TrendStatus};
use water_stability_toolbox::water::{AnalysisType, Bounds, Parameter, TargetRangeConfig};

#[test]
fn actions_depend_on_side_and_parameter() {
    let band = Bounds::between(6.5, 7.8);
    assert_eq!(suggested_action(Parameter::Ph, 7.0, band), WITHIN_TARGET);
    assert!(suggested_action(Parameter::Ph, 9.0, band).contains("pH into range"));
    assert_eq!(
        suggested_action(Parameter::Cycle, 4.0, Bounds::between(5.0, 8.0)),
        "Value below target range. Increase to 5.00-8.00 range."
    );
    assert!(suggested_action(Parameter::Tds, 900.0, Bounds::between(500.0, 800.0))
        .starts_with("High TDS"));
    assert_eq!(
        suggested_action(Parameter::Iron, 4.0, Bounds::at_most(3.0)),
        "Value exceeds maximum (3.00). Reduce to acceptable level."
    );
}

#[test]
fn compliance_skips_disabled_absent_and_unbounded() {
    let targets = TargetRangeConfig::default();
    let checks = check_compliance(
        AnalysisType::Boiler,
        &[
            (Parameter::Ph, Some(12.0)),
            (Parameter::PAlkalinity, Some(300.0)),
            (Parameter::Sulphite, Some(80.0)),
            (Parameter::MAlkalinity, None),
        ],
        &targets,
    );
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].parameter, Parameter::Ph);
    assert!(!checks[0].within);
}

#[test]
fn single_check_reports_bounds() {
    let check = check_parameter(Parameter::Chloride, 100.0, Bounds::at_most(250.0));
    assert!(check.within);
    assert_eq!(check.bounds.to_string(), "≤ 250.00");
}

#[test]
fn trend_status_per_parameter() {
    assert_eq!(trend_status("pH", 7.0), TrendStatus::Optimal);
    assert_eq!(trend_status("ph", 6.0), TrendStatus::Low);
    assert_eq!(trend_status("lsi", 0.8), TrendStatus::Scaling);
    assert_eq!(trend_status("rsi", 7.5), TrendStatus::Corrosion);
    assert_eq!(trend_status("lr", 0.1), TrendStatus::Acceptable);
    assert_eq!(trend_status("lr", 0.5), TrendStatus::Moderate);
    assert_eq!(trend_status("tds", 900.0), TrendStatus::Normal);
    assert_eq!(TrendStatus::Scaling.to_string(), "scaling");
}

#[test]
fn rising_series_is_increasing() {
    let values = [Some(500.0), Some(520.0), None, Some(700.0), Some(760.0)];
    let a = analyze_trend("TDS", &values, Bounds::between(500.0, 800.0)).expect("analysis");
    assert_eq!(a.direction, TrendDirection::Increasing);
    assert_eq!(
        a.description,
        "Values range from 500.00 to 760.00, with increasing trend"
    );
    assert_eq!(
        a.interpretation.as_deref(),
        Some("All values are within the optimal range (500.00-800.00).")
    );
}

#[test]
fn mostly_out_of_band_ph_gets_advice() {
    let values = [Some(8.5), Some(8.6), Some(8.4), Some(7.0)];
    let a = analyze_trend("pH", &values, Bounds::between(6.5, 8.0)).expect("analysis");
    let interpretation = a.interpretation.expect("interpretation");
    assert!(interpretation.starts_with("Values frequently exceed"));
    assert!(a.recommendation.expect("rec").contains("stabilize pH"));
}

#[test]
fn maximum_only_bound() {
    let a = analyze_trend("iron", &[Some(1.0), Some(4.0)], Bounds::at_most(3.0)).expect("analysis");
    assert_eq!(a.description, "Values range from 1.00 to 4.00");
    assert_eq!(
        a.recommendation.as_deref(),
        Some("Reduce iron to acceptable levels below 3.00.")
    );
}

#[test]
fn empty_series_has_no_analysis() {
    assert!(analyze_trend("ph", &[None, None], Bounds::unbounded()).is_none());
    let a = analyze_trend("cycle", &[Some(5.0)], Bounds::unbounded()).expect("analysis");
    assert_eq!(a.description, "Value: 5.00");
    assert!(a.interpretation.is_none());
}
