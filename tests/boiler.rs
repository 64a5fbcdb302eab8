use approx::assert_abs_diff_eq;
use water_stability_toolbox::water::boiler::boiler_status;
use water_stability_toolbox::water::{
    compute_with_defaults, IssueKind, OverallStatus, Parameter, Priority, WaterReading,
};

fn ideal_boiler(m_alk: Option<f64>) -> WaterReading {
    let mut reading = WaterReading::boiler(11.0, 3000.0, 1.0);
    reading.boiler.m_alkalinity = m_alk;
    reading
}

#[test]
fn m_alkalinity_above_band_costs_two_points_per_fifty_ppm() {
    let res = compute_with_defaults(&ideal_boiler(Some(1000.0))).expect("compute");
    // 1000 - 600 = 400 ppm → 8 단계 × 2점
    assert_abs_diff_eq!(res.stability_score.expect("score"), 84.0, epsilon = 1e-9);
    assert_eq!(res.overall_status, Some(OverallStatus::Stable));
    assert_eq!(res.deductions.len(), 1);
    assert_eq!(res.deductions[0].parameter, Parameter::MAlkalinity);
    assert!(res.lsi.is_none() && res.rsi.is_none());
}

#[test]
fn in_band_boiler_scores_full_marks() {
    let res = compute_with_defaults(&ideal_boiler(Some(400.0))).expect("compute");
    assert_eq!(res.stability_score, Some(100.0));
    assert!(res.deductions.is_empty());
    assert!(res
        .recommendations
        .iter()
        .all(|r| r.priority == Priority::Low && r.description.ends_with("is within optimal range.")));
}

#[test]
fn ph_deduction_is_capped() {
    let mut reading = ideal_boiler(Some(400.0));
    reading.ph = 8.0;
    let res = compute_with_defaults(&reading).expect("compute");
    let ph = res
        .deductions
        .iter()
        .find(|d| d.parameter == Parameter::Ph)
        .expect("ph deduction");
    assert_eq!(ph.points, 30.0);
    assert_abs_diff_eq!(res.stability_score.expect("score"), 70.0, epsilon = 1e-9);
    assert_eq!(res.overall_status, Some(OverallStatus::SlightlyUnstable));
}

#[test]
fn small_ph_deviation_scales_linearly() {
    let mut reading = ideal_boiler(Some(400.0));
    reading.ph = 11.7;
    let res = compute_with_defaults(&reading).expect("compute");
    assert_abs_diff_eq!(res.stability_score.expect("score"), 90.0, epsilon = 1e-6);
}

#[test]
fn severe_tds_and_hardness_double_the_deduction() {
    let mut reading = ideal_boiler(Some(400.0));
    reading.tds = 3600.0;
    reading.hardness = 3.0;
    let res = compute_with_defaults(&reading).expect("compute");
    assert_abs_diff_eq!(res.stability_score.expect("score"), 80.0, epsilon = 1e-9);

    reading.tds = 5000.0;
    reading.hardness = 10.0;
    let res = compute_with_defaults(&reading).expect("compute");
    assert_abs_diff_eq!(res.stability_score.expect("score"), 60.0, epsilon = 1e-9);
}

#[test]
fn score_is_clamped_at_zero() {
    let mut reading = WaterReading::boiler(9.0, 5000.0, 10.0);
    reading.boiler.m_alkalinity = Some(2000.0);
    let res = compute_with_defaults(&reading).expect("compute");
    assert_eq!(res.stability_score, Some(0.0));
    assert_eq!(res.overall_status, Some(OverallStatus::HighlyUnstable));
}

#[test]
fn missing_m_alkalinity_is_reported_not_penalised() {
    let res = compute_with_defaults(&ideal_boiler(None)).expect("compute");
    assert_eq!(res.stability_score, Some(100.0));
    assert!(res
        .issues
        .iter()
        .any(|i| i.parameter == Parameter::MAlkalinity && i.kind == IssueKind::Missing));
}

#[test]
fn invalid_ph_makes_boiler_uncomputable() {
    let mut reading = ideal_boiler(Some(400.0));
    reading.ph = f64::NAN;
    let res = compute_with_defaults(&reading).expect("data problems are not errors");
    assert!(res.stability_score.is_none());
    assert!(res.require_computable().is_err());
}

#[test]
fn out_of_band_hardness_is_high_priority() {
    let mut reading = ideal_boiler(Some(400.0));
    reading.hardness = 4.0;
    let res = compute_with_defaults(&reading).expect("compute");
    let first = &res.recommendations[0];
    assert_eq!(first.title, "Hardness Control");
    assert_eq!(first.priority, Priority::High);
}

#[test]
fn status_bands() {
    assert_eq!(boiler_status(80.0), OverallStatus::Stable);
    assert_eq!(boiler_status(79.9), OverallStatus::SlightlyUnstable);
    assert_eq!(boiler_status(60.0), OverallStatus::SlightlyUnstable);
    assert_eq!(boiler_status(40.0), OverallStatus::Unstable);
    assert_eq!(boiler_status(39.9), OverallStatus::HighlyUnstable);
}
