use water_stability_toolbox::water::score::{assess_cooling, IndexStatuses};
use water_stability_toolbox::water::{
    LrStatus, LsiStatus, OverallStatus, PsiStatus, RsiStatus, Tier,
};

#[test]
fn lsi_boundaries_belong_to_the_lower_band() {
    assert_eq!(LsiStatus::classify(-2.0), LsiStatus::SevereCorrosion);
    assert_eq!(LsiStatus::classify(-1.5), LsiStatus::MildCorrosion);
    assert_eq!(LsiStatus::classify(-1.0), LsiStatus::MildCorrosion);
    assert_eq!(LsiStatus::classify(0.0), LsiStatus::NearBalance);
    assert_eq!(LsiStatus::classify(0.5), LsiStatus::NearBalance);
    assert_eq!(LsiStatus::classify(0.51), LsiStatus::ModerateScale);
    assert_eq!(LsiStatus::classify(1.0), LsiStatus::ModerateScale);
    assert_eq!(LsiStatus::classify(1.01), LsiStatus::SevereScale);
}

#[test]
fn rsi_boundaries_belong_to_the_upper_band() {
    assert_eq!(RsiStatus::classify(4.9), RsiStatus::HeavyScale);
    assert_eq!(RsiStatus::classify(5.0), RsiStatus::LightScale);
    assert_eq!(RsiStatus::classify(6.0), RsiStatus::Balanced);
    assert_eq!(RsiStatus::classify(7.0), RsiStatus::SignificantCorrosion);
    assert_eq!(RsiStatus::classify(7.5), RsiStatus::HeavyCorrosion);
    assert_eq!(RsiStatus::classify(9.0), RsiStatus::IntolerableCorrosion);
}

#[test]
fn psi_and_lr_bands_include_their_edges() {
    assert_eq!(PsiStatus::classify(4.49), PsiStatus::Scale);
    assert_eq!(PsiStatus::classify(4.5), PsiStatus::Optimal);
    assert_eq!(PsiStatus::classify(6.5), PsiStatus::Optimal);
    assert_eq!(PsiStatus::classify(6.51), PsiStatus::Corrode);

    assert_eq!(LrStatus::classify(0.79), LrStatus::WillNotInterfere);
    assert_eq!(LrStatus::classify(0.8), LrStatus::MayInterfere);
    assert_eq!(LrStatus::classify(1.2), LrStatus::MayInterfere);
    assert_eq!(LrStatus::classify(1.21), LrStatus::HighLocalized);
}

#[test]
fn statuses_serialise_as_display_text() {
    let json = serde_json::to_string(&LsiStatus::NearBalance).expect("json");
    assert_eq!(json, "\"Near Balance\"");
    assert_eq!(RsiStatus::Balanced.to_string(), "Little scale or corrosion");
    assert_eq!(
        serde_json::to_string(&OverallStatus::SlightlyUnstable).expect("json"),
        "\"Slightly Unstable\""
    );
    assert_eq!(
        PsiStatus::Optimal.as_str(),
        "Water is in optimal range with no corrosion or scaling"
    );
}

#[test]
fn tiers_follow_the_table() {
    assert_eq!(LsiStatus::ModerateScale.tier(), Tier::Moderate);
    assert_eq!(RsiStatus::HeavyScale.tier(), Tier::Bad);
    assert_eq!(PsiStatus::Scale.tier(), Tier::Moderate);
    assert_eq!(LrStatus::MayInterfere.tier(), Tier::Moderate);
}

#[test]
fn all_good_indices_score_top() {
    let statuses = IndexStatuses {
        lsi: Some(LsiStatus::NearBalance),
        rsi: Some(RsiStatus::Balanced),
        psi: Some(PsiStatus::Optimal),
        lr: Some(LrStatus::WillNotInterfere),
    };
    let a = assess_cooling(&statuses).expect("assessment");
    assert_eq!(a.score, 100.0);
    assert_eq!(a.good_count, 4);
    assert_eq!(a.overall, OverallStatus::Stable);
}

#[test]
fn two_good_indices_are_moderate() {
    let statuses = IndexStatuses {
        lsi: Some(LsiStatus::NearBalance),
        rsi: Some(RsiStatus::Balanced),
        psi: Some(PsiStatus::Corrode),
        lr: None,
    };
    let a = assess_cooling(&statuses).expect("assessment");
    assert_eq!(a.score, 68.0);
    assert_eq!(a.overall, OverallStatus::Moderate);
}

#[test]
fn all_bad_indices_score_low_and_unstable() {
    let statuses = IndexStatuses {
        lsi: Some(LsiStatus::SevereScale),
        rsi: Some(RsiStatus::HeavyScale),
        psi: Some(PsiStatus::Corrode),
        lr: Some(LrStatus::HighLocalized),
    };
    let a = assess_cooling(&statuses).expect("assessment");
    assert_eq!(a.score, 0.0);
    assert_eq!(a.overall, OverallStatus::Unstable);
}

#[test]
fn no_classified_index_means_no_score() {
    assert!(assess_cooling(&IndexStatuses::default()).is_none());
}
