use water_stability_toolbox::water::{
    compute, compute_with_defaults, AnalysisType, CalculationError, CalculationRequest,
    OverallStatus, Parameter, Priority, RecommendationPolicy, TargetOverride, TargetRangeConfig,
    WaterReading,
};

fn cooling_reading() -> WaterReading {
    let mut reading = WaterReading::cooling(7.2, 150.0, 180.0);
    reading.cooling.total_alkalinity = Some(120.0);
    reading.cooling.temperature = Some(25.0);
    reading.cooling.chloride = Some(100.0);
    reading.cooling.sulphate = Some(100.0);
    reading
}

#[test]
fn compute_is_idempotent() {
    let reading = cooling_reading();
    let first = compute_with_defaults(&reading).expect("compute");
    let second = compute_with_defaults(&reading).expect("compute");
    assert_eq!(
        serde_json::to_string(&first).expect("json"),
        serde_json::to_string(&second).expect("json")
    );
}

#[test]
fn high_priority_recommendations_come_first_in_creation_order() {
    let res = compute_with_defaults(&cooling_reading()).expect("compute");
    let first_non_high = res
        .recommendations
        .iter()
        .position(|r| r.priority != Priority::High)
        .expect("baseline recommendations");
    assert!(first_non_high > 0);
    assert!(res.recommendations[first_non_high..]
        .iter()
        .all(|r| r.priority != Priority::High));
    for group in [
        &res.recommendations[..first_non_high],
        &res.recommendations[first_non_high..],
    ] {
        assert!(group.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }
}

#[test]
fn unstable_cooling_asks_for_more_monitoring() {
    // LR ≈ 3.67 → 국부 부식, RSI/PSI도 부식 쪽
    let res = compute_with_defaults(&cooling_reading()).expect("compute");
    assert_eq!(res.overall_status, Some(OverallStatus::Unstable));
    assert!(res.lr.expect("lr") > 1.2);
    let titles: Vec<&str> = res.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert!(titles.contains(&"Increase monitoring frequency"));
    assert!(titles.contains(&"Address chloride and sulfate corrosion"));
}

#[test]
fn baseline_recommendations_are_always_present() {
    let res = compute_with_defaults(&cooling_reading()).expect("compute");
    for title in [
        "Regular Water Testing",
        "Equipment Maintenance",
        "Record Keeping",
        "Chloride and Sulphate Monitoring",
        "Temperature Monitoring",
    ] {
        assert!(
            res.recommendations.iter().any(|r| r.title == title),
            "missing {title}"
        );
    }
    assert!(res.recommendations.iter().all(|r| !r.is_implemented));
}

#[test]
fn tds_alert_threshold_is_a_policy_value() {
    let mut reading = cooling_reading();
    reading.tds = 300.0;
    let titled = |policy: &RecommendationPolicy| {
        compute(&reading, &TargetRangeConfig::default(), policy)
            .expect("compute")
            .recommendations
            .iter()
            .any(|r| r.title == "High TDS Levels")
    };
    assert!(!titled(&RecommendationPolicy::default()));
    let strict = RecommendationPolicy {
        tds_alert_ppm: 200.0,
        ..RecommendationPolicy::default()
    };
    assert!(titled(&strict));
}

#[test]
fn disabled_lsi_flag_removes_the_index() {
    let mut targets = TargetRangeConfig::default();
    targets.cooling.lsi.enabled = false;
    let res = compute(
        &cooling_reading(),
        &targets,
        &RecommendationPolicy::default(),
    )
    .expect("compute");
    assert!(res.lsi.is_none());
    assert!(res.lsi_status.is_none());
    assert!(res.rsi.is_some());
    assert!(res.compliance.iter().all(|c| c.parameter != Parameter::Lsi));
}

#[test]
fn system_override_replaces_plant_bound() {
    let request = CalculationRequest {
        overrides: vec![TargetOverride {
            analysis: AnalysisType::Boiler,
            parameter: Parameter::MAlkalinity,
            enabled: None,
            min: None,
            max: Some(1200.0),
        }],
        ..CalculationRequest::new({
            let mut reading = WaterReading::boiler(11.0, 3000.0, 1.0);
            reading.boiler.m_alkalinity = Some(1000.0);
            reading
        })
    };
    let res = request.compute().expect("compute");
    assert_eq!(res.stability_score, Some(100.0));

    let resolved = TargetRangeConfig::resolve(None, &request.overrides).expect("resolve");
    let bounds = resolved.bounds(AnalysisType::Boiler, Parameter::MAlkalinity);
    assert_eq!((bounds.min, bounds.max), (Some(250.0), Some(1200.0)));
}

#[test]
fn inverted_bounds_are_rejected() {
    let mut targets = TargetRangeConfig::default();
    targets.cooling.ph.min = Some(9.0);
    targets.cooling.ph.max = Some(6.0);
    let err = compute(
        &cooling_reading(),
        &targets,
        &RecommendationPolicy::default(),
    )
    .expect_err("min > max");
    assert!(matches!(err, CalculationError::InvalidConfig { .. }));
}

#[test]
fn override_for_foreign_parameter_is_rejected() {
    let err = TargetRangeConfig::resolve(
        None,
        &[TargetOverride {
            analysis: AnalysisType::Cooling,
            parameter: Parameter::Sulphite,
            enabled: Some(true),
            min: None,
            max: None,
        }],
    )
    .expect_err("sulphite is boiler-only");
    assert!(matches!(err, CalculationError::InvalidConfig { .. }));
}

#[test]
fn unknown_analysis_type_is_an_error() {
    let err = "steam".parse::<AnalysisType>().expect_err("unknown");
    assert_eq!(err, CalculationError::UnknownAnalysisType("steam".into()));
    assert_eq!("Boiler".parse::<AnalysisType>(), Ok(AnalysisType::Boiler));
}

#[test]
fn nothing_computable_becomes_an_error_at_the_boundary() {
    let reading = WaterReading::cooling(7.0, 100.0, 100.0);
    let res = compute_with_defaults(&reading).expect("compute");
    assert!(!res.is_computable());
    match res.require_computable() {
        Err(CalculationError::NothingComputable { analysis, issues }) => {
            assert_eq!(analysis, AnalysisType::Cooling);
            assert!(!issues.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn request_round_trips_through_json() {
    let json = r#"{
        "reading": {
            "analysis_type": "cooling",
            "analysis_date": "2024-05-01",
            "ph": 9.0, "tds": 800, "hardness": 400,
            "cooling": { "total_alkalinity": 300, "temperature": 35 }
        }
    }"#;
    let request: CalculationRequest = serde_json::from_str(json).expect("request");
    let res = request.compute().expect("compute");
    assert!(res.lsi.expect("lsi") > 0.5);
    let value = serde_json::to_value(&res).expect("json");
    assert_eq!(value["lsi_status"], "Severe Scale Forming");
    let recs = value["recommendations"].as_array().expect("array");
    assert!(recs
        .iter()
        .any(|r| r["type"] == "scaling" && r["priority"] == "high"));
}

#[test]
fn request_policy_is_kept_when_sent() {
    use water_stability_toolbox::app::{compute_file, Session};
    use water_stability_toolbox::config::Config;
    use water_stability_toolbox::i18n::Translator;

    let mut config = Config::default();
    config.policy.tds_alert_ppm = 200.0;
    let session = Session::new(config, Translator::new("en")).expect("session");

    let dir = std::env::temp_dir().join(format!("water_stability_req_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("dir");
    let (input, output) = (dir.join("request.json"), dir.join("result.json"));
    let mut reading = cooling_reading();
    reading.tds = 300.0;
    let flags_tds = |request: &CalculationRequest| {
        std::fs::write(&input, serde_json::to_string(request).expect("json")).expect("write");
        compute_file(&session, &input, Some(&output))
            .expect("compute")
            .recommendations
            .iter()
            .any(|r| r.title == "High TDS Levels")
    };

    // 정책이 없으면 설정 파일의 200 ppm 기준
    assert!(flags_tds(&CalculationRequest::new(reading.clone())));
    // 기본값과 같은 정책이라도 요청에 있으면 그대로 쓴다
    let explicit = CalculationRequest {
        policy: Some(RecommendationPolicy::default()),
        ..CalculationRequest::new(reading)
    };
    assert!(!flags_tds(&explicit));

    std::fs::remove_dir_all(&dir).expect("cleanup");
}
