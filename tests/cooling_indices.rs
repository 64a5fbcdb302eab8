use approx::assert_abs_diff_eq;
use water_stability_toolbox::water::indices::{
    carbonate_speciation, langelier_ratio, saturation_ph, RatioInputs, RatioSentinel,
    SaturationInputs, SpeciationSource, LR_CEILING,
};
use water_stability_toolbox::water::{
    compute_with_defaults, Gated, IssueKind, LsiStatus, Parameter, Priority, PsiStatus,
    RecommendationType, RsiStatus, WaterReading,
};

fn good_water() -> WaterReading {
    let mut reading = WaterReading::cooling(7.2, 150.0, 180.0);
    reading.cooling.total_alkalinity = Some(120.0);
    reading.cooling.temperature = Some(25.0);
    reading
}

fn scaling_water() -> WaterReading {
    let mut reading = WaterReading::cooling(9.0, 800.0, 400.0);
    reading.cooling.total_alkalinity = Some(300.0);
    reading.cooling.temperature = Some(35.0);
    reading
}

#[test]
fn saturation_ph_matches_factor_formula() {
    let phs = saturation_ph(&SaturationInputs {
        tds: 150.0,
        hardness: 180.0,
        total_alkalinity: 120.0,
        temperature_c: 25.0,
    });
    assert_abs_diff_eq!(phs, 7.5714, epsilon = 1e-3);
}

#[test]
fn good_water_is_near_balance() {
    let res = compute_with_defaults(&good_water()).expect("compute");
    let lsi = res.lsi.expect("lsi");
    assert_abs_diff_eq!(lsi, -0.371, epsilon = 1e-3);
    assert!(lsi.abs() < 0.5);
    assert_eq!(res.lsi_status, Some(LsiStatus::NearBalance));
    assert_eq!(res.rsi_status, Some(RsiStatus::HeavyCorrosion));
    assert_eq!(res.psi_status, Some(PsiStatus::Corrode));
    // 염화물/황산염이 없으므로 LR은 계산하지 않는다
    assert!(res.lr.is_none());
    assert!(res
        .issues
        .iter()
        .any(|i| i.parameter == Parameter::Sulphate && i.kind == IssueKind::Missing));
}

#[test]
fn lsi_and_rsi_share_saturation_ph() {
    for reading in [good_water(), scaling_water()] {
        let res = compute_with_defaults(&reading).expect("compute");
        let phs = res.phs.expect("phs");
        let (lsi, rsi) = (res.lsi.expect("lsi"), res.rsi.expect("rsi"));
        assert_abs_diff_eq!(lsi + rsi, phs, epsilon = 1e-9);
        assert_abs_diff_eq!(lsi, reading.ph - phs, epsilon = 1e-12);
        assert_abs_diff_eq!(rsi, 2.0 * phs - reading.ph, epsilon = 1e-12);
    }
}

#[test]
fn scaling_water_flags_high_priority_scaling() {
    let res = compute_with_defaults(&scaling_water()).expect("compute");
    assert_abs_diff_eq!(res.phs.expect("phs"), 6.711, epsilon = 1e-3);
    let lsi = res.lsi.expect("lsi");
    assert!(lsi > 0.5, "lsi={lsi}");
    let status = res.lsi_status.expect("status");
    assert_eq!(status, LsiStatus::SevereScale);
    assert!(status.is_scale_forming());
    assert!(res.recommendations.iter().any(|r| r.kind == RecommendationType::Scaling
        && r.priority == Priority::High
        && r.title == "Scaling Risk Detected"));
}

#[test]
fn missing_alkalinity_suppresses_every_index() {
    let mut reading = good_water();
    reading.cooling.total_alkalinity = None;
    reading.cooling.chloride = Some(100.0);
    let res = compute_with_defaults(&reading).expect("absence is not an error");
    assert!(res.phs.is_none());
    assert!(res.lsi.is_none() && res.rsi.is_none() && res.psi.is_none() && res.lr.is_none());
    assert!(res.stability_score.is_none());
    assert!(res.overall_status.is_none());
    assert!(res
        .issues
        .iter()
        .any(|i| i.parameter == Parameter::TotalAlkalinity && i.kind == IssueKind::Missing));
}

#[test]
fn non_positive_log_input_is_a_domain_issue() {
    let mut reading = good_water();
    reading.hardness = 0.0;
    let res = compute_with_defaults(&reading).expect("compute");
    assert!(res.lsi.is_none());
    assert!(res
        .issues
        .iter()
        .any(|i| i.parameter == Parameter::Hardness && i.kind == IssueKind::Domain));
}

#[test]
fn runaway_ratio_reports_ceiling() {
    let mut reading = WaterReading::cooling(7.0, 500.0, 100.0);
    reading.cooling.total_alkalinity = Some(1.0);
    reading.cooling.chloride = Some(1e6);
    reading.cooling.sulphate = Some(0.0);
    let res = compute_with_defaults(&reading).expect("compute");
    assert_eq!(res.lr, Some(LR_CEILING));

    let lr = langelier_ratio(&RatioInputs {
        ph: 7.0,
        total_alkalinity: 1.0,
        chloride: Gated::Enabled(Some(1e6)),
        sulphate: Some(0.0),
        temperature_c: None,
    });
    assert_eq!(lr.value, 5.0);
    assert_eq!(lr.sentinel, Some(RatioSentinel::Runaway));
}

#[test]
fn ratio_within_range_is_not_clamped() {
    let lr = langelier_ratio(&RatioInputs {
        ph: 7.5,
        total_alkalinity: 200.0,
        chloride: Gated::Enabled(Some(50.0)),
        sulphate: None,
        temperature_c: Some(30.0),
    });
    assert_abs_diff_eq!(lr.value, 0.7514, epsilon = 1e-3);
    assert!(lr.sentinel.is_none());
    assert_eq!(lr.speciation.source, SpeciationSource::Equilibrium);
}

#[test]
fn disabled_chloride_is_ignored_by_ratio() {
    let base = RatioInputs {
        ph: 7.5,
        total_alkalinity: 200.0,
        chloride: Gated::Disabled,
        sulphate: Some(50.0),
        temperature_c: Some(30.0),
    };
    let disabled = langelier_ratio(&base);
    let zero = langelier_ratio(&RatioInputs {
        chloride: Gated::Enabled(Some(0.0)),
        ..base
    });
    assert_eq!(disabled.value, zero.value);
    assert_abs_diff_eq!(disabled.value, 0.2779, epsilon = 1e-3);
}

#[test]
fn disabled_chloride_in_targets_never_reaches_ratio() {
    let mut reading = good_water();
    reading.cooling.chloride = Some(5000.0);

    let mut targets = water_stability_toolbox::water::TargetRangeConfig::default();
    targets.cooling.chloride.enabled = false;
    let res = water_stability_toolbox::water::compute(
        &reading,
        &targets,
        &Default::default(),
    )
    .expect("compute");
    // 염화물이 비활성이고 황산염이 없으면 LR 자체가 빠진다
    assert!(res.lr.is_none());
    assert!(res.compliance.iter().all(|c| c.parameter != Parameter::Chloride));
    assert!(res.recommendations.iter().all(|r| r.title != "Chloride Out of Range"));
}

#[test]
fn ratio_stays_within_bounds() {
    for (cl, so4, alk, ph) in [
        (0.0, 0.0, 50.0, 7.0),
        (10.0, 5.0, 300.0, 8.2),
        (300.0, 400.0, 20.0, 6.8),
        (1e9, 1e9, 0.001, 4.0),
    ] {
        let lr = langelier_ratio(&RatioInputs {
            ph,
            total_alkalinity: alk,
            chloride: Gated::Enabled(Some(cl)),
            sulphate: Some(so4),
            temperature_c: Some(25.0),
        });
        assert!((0.0..=LR_CEILING).contains(&lr.value), "lr={}", lr.value);
    }
}

#[test]
fn speciation_fractions_sum_below_one() {
    let s = carbonate_speciation(7.2, 25.0);
    assert_eq!(s.source, SpeciationSource::Equilibrium);
    assert!(s.hco3 > 0.8 && s.hco3 < 1.0);
    assert!(s.hco3 + s.co3 < 1.0);
}

#[test]
fn extreme_temperature_falls_back_to_ph_bands() {
    // 매우 높은 켈빈 온도에서 pK가 커져 평형상수가 언더플로한다
    let s = carbonate_speciation(9.0, 1.0e6);
    assert_eq!(s.source, SpeciationSource::PhBand);
    assert_eq!((s.hco3, s.co3), (0.30, 0.70));
    let s = carbonate_speciation(6.0, 1.0e6);
    assert_eq!((s.hco3, s.co3), (0.95, 0.05));
    let s = carbonate_speciation(7.5, 1.0e6);
    assert_eq!((s.hco3, s.co3), (0.80, 0.20));
}

#[test]
fn vanishing_carbonate_reports_fixed_ratio() {
    let lr = langelier_ratio(&RatioInputs {
        ph: 7.5,
        total_alkalinity: 1e-9,
        chloride: Gated::Enabled(Some(50.0)),
        sulphate: Some(20.0),
        temperature_c: Some(25.0),
    });
    assert_eq!(lr.value, 2.0);
    assert_eq!(lr.raw, 2.0);
    assert_eq!(lr.sentinel, Some(RatioSentinel::NoCarbonate));
}

#[test]
fn disabled_chloride_matches_zero_chloride_through_engine() {
    let mut reading = good_water();
    reading.cooling.chloride = Some(400.0);
    reading.cooling.sulphate = Some(60.0);

    let mut disabled = water_stability_toolbox::water::TargetRangeConfig::default();
    disabled.cooling.chloride.enabled = false;
    let with_disabled =
        water_stability_toolbox::water::compute(&reading, &disabled, &Default::default())
            .expect("compute");

    reading.cooling.chloride = Some(0.0);
    let with_zero = compute_with_defaults(&reading).expect("compute");

    assert!(with_disabled.lr.is_some());
    assert_eq!(with_disabled.lr, with_zero.lr);
    assert_eq!(with_disabled.lr_status, with_zero.lr_status);
}
