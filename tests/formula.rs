use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use water_stability_toolbox::formula::{
    default_calculations, variable_name, DataCalculation, Formula, FormulaError,
};

fn vars(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn default_efficiency_score() {
    let calcs = default_calculations();
    assert_eq!(calcs.len(), 3);
    let efficiency = &calcs[0];
    let score = efficiency
        .calculate_score([("Temperature", 50.0), ("Pressure", 100.0), ("Flow Rate", 20.0)])
        .expect("score");
    // 15 + 40 + 6
    assert_abs_diff_eq!(score, 61.0, epsilon = 1e-9);
}

#[test]
fn conditional_guards_zero_input() {
    let performance = &default_calculations()[1];
    assert_eq!(
        performance.calculate_score([("output", 5.0), ("input", 0.0)]),
        Some(0.0)
    );
    assert_eq!(
        performance.calculate_score([("output", 45.0), ("input", 60.0)]),
        Some(75.0)
    );
}

#[test]
fn score_is_rounded_to_two_places() {
    let quality = &default_calculations()[2];
    let score = quality
        .calculate_score([("defects", 1.0), ("total units", 3.0)])
        .expect("score");
    assert_eq!(score, 66.67);
}

#[test]
fn empty_or_failing_inputs_give_no_score() {
    let quality = &default_calculations()[2];
    assert_eq!(quality.calculate_score(std::iter::empty()), None);
    // total_units 누락
    assert_eq!(quality.calculate_score([("defects", 1.0)]), None);
    // 0으로 나누기
    assert_eq!(
        quality.calculate_score([("defects", 1.0), ("total_units", 0.0)]),
        None
    );
}

#[test]
fn only_allow_listed_syntax_is_accepted() {
    assert!(matches!(
        Formula::parse("__import__('os')"),
        Err(FormulaError::UnexpectedChar { .. }) | Err(FormulaError::UnknownFunction(_))
    ));
    assert_eq!(
        Formula::parse("exp(2)").expect_err("not allowed"),
        FormulaError::UnknownFunction("exp".into())
    );
    assert!(matches!(
        Formula::parse("min()"),
        Err(FormulaError::Arity { name: "min", .. })
    ));
    assert!(Formula::parse("1 +").is_err());
}

#[test]
fn boolean_operators_and_comparison_chains() {
    let f = Formula::parse("1 < x <= 3 and not y").expect("parse");
    assert_eq!(f.evaluate(&vars(&[("x", 2.0), ("y", 0.0)])), Ok(1.0));
    assert_eq!(f.evaluate(&vars(&[("x", 4.0), ("y", 0.0)])), Ok(0.0));

    let f = Formula::parse("a or b").expect("parse");
    assert_eq!(f.evaluate(&vars(&[("a", 0.0), ("b", 7.0)])), Ok(7.0));
    // 단락 평가: b가 없어도 a가 참이면 성공
    assert_eq!(f.evaluate(&vars(&[("a", 2.0)])), Ok(2.0));
}

#[test]
fn variables_are_collected_and_unknown_ones_fail() {
    let f = Formula::parse("round(alpha * 2 + max(beta, 1), 1)").expect("parse");
    let names: Vec<String> = f.variables().into_iter().collect();
    assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(
        f.evaluate(&vars(&[("alpha", 1.0)])),
        Err(FormulaError::UnknownVariable("beta".into()))
    );
    assert_eq!(f.source(), "round(alpha * 2 + max(beta, 1), 1)");
}

#[test]
fn category_names_become_identifiers() {
    assert_eq!(variable_name(" Flow Rate "), "flow_rate");
    let calc = DataCalculation::new("t", "", "flow_rate * 2");
    assert_eq!(calc.calculate_score([("Flow Rate", 1.5)]), Some(3.0));
}

#[test]
fn deep_nesting_is_rejected_without_overflow() {
    let deep = format!("{}1{}", "(".repeat(3_000), ")".repeat(3_000));
    assert!(matches!(Formula::parse(&deep), Err(FormulaError::Syntax(_))));
    assert!(Formula::parse(&"-".repeat(500)).is_err());
    assert!(Formula::parse(&format!("{}1", "not ".repeat(500))).is_err());

    let shallow = format!("{}x{}", "(".repeat(20), ")".repeat(20));
    let f = Formula::parse(&shallow).expect("parse");
    assert_eq!(f.evaluate(&vars(&[("x", 3.0)])), Ok(3.0));
}

#[test]
fn overlong_chain_is_rejected() {
    let chain = vec!["1"; 2_000].join(" + ");
    assert!(matches!(Formula::parse(&chain), Err(FormulaError::Syntax(_))));
    let short = vec!["1"; 100].join(" + ");
    assert_eq!(
        Formula::parse(&short).expect("parse").evaluate(&HashMap::new()),
        Ok(100.0)
    );
}

#[test]
fn round_with_extreme_digits() {
    let eval = |src: &str| Formula::parse(src).expect("parse").evaluate(&HashMap::new());
    assert_eq!(eval("round(1.5, 400)"), Ok(1.5));
    assert_eq!(eval("round(1.5, -400)"), Ok(0.0));
    assert_abs_diff_eq!(eval("round(1234.5, -2)").expect("eval"), 1200.0, epsilon = 1e-9);
}
