use super::common::*;
use crate::workflows::consortium::evaluation::{
    compute_performance_score, PerformanceMethod, PerformanceScore,
};

#[test]
fn ratio_table_scores_weighted_performance_against_the_base_amount() {
    let catalog = standard_catalog();
    let ruleset = standard_ruleset("mois", "under_3b");

    let strong = compute_performance_score(&ruleset, &catalog, 65_000_000_000.0, 1_000_000_000.0);
    assert_close(strong.ratio, 6500.0);
    assert_eq!(strong.score, 15.0);

    let middling = compute_performance_score(&ruleset, &catalog, 650_000_000.0, 1_000_000_000.0);
    assert_close(middling.ratio, 65.0);
    assert_eq!(middling.score, 11.0);

    let weak = compute_performance_score(&ruleset, &catalog, 100_000_000.0, 1_000_000_000.0);
    assert_close(weak.ratio, 10.0);
    assert_eq!(weak.score, 1.0);
}

#[test]
fn ratio_table_without_base_amount_uses_zero_ratio() {
    let catalog = standard_catalog();
    let ruleset = standard_ruleset("mois", "under_3b");

    let result = compute_performance_score(&ruleset, &catalog, 650_000_000.0, 0.0);
    assert_eq!(result.ratio, 0.0);
    assert_eq!(result.score, 1.0);
}

#[test]
fn ratio_table_without_table_falls_back_to_base_score() {
    let catalog = standard_catalog();
    let mut ruleset = standard_ruleset("mois", "under_3b");
    ruleset.performance_score_table_id = None;
    ruleset.performance_base_score = 4.0;

    let result = compute_performance_score(&ruleset, &catalog, 650_000_000.0, 1_000_000_000.0);
    assert_eq!(result.score, 4.0);
    assert_close(result.ratio, 65.0);
}

#[test]
fn direct_formula_scales_to_max_score_and_caps() {
    let catalog = standard_catalog();
    let ruleset = standard_ruleset("pps", "under_5b");

    let half = compute_performance_score(&ruleset, &catalog, 500_000_000.0, 1_000_000_000.0);
    assert_close(half.score, 7.5);
    assert_close(half.ratio, 50.0);

    let capped =
        compute_performance_score(&ruleset, &catalog, 90_000_000_000.0, 1_000_000_000.0);
    assert_eq!(capped.score, 15.0);
    assert_close(capped.ratio, 100.0);
}

#[test]
fn direct_formula_without_positive_base_scores_zero() {
    let catalog = standard_catalog();
    let ruleset = standard_ruleset("pps", "under_5b");

    let result = compute_performance_score(&ruleset, &catalog, 500_000_000.0, 0.0);
    assert_eq!(result, PerformanceScore::default());

    let mut zero_cap = ruleset.clone();
    zero_cap.performance_params.max_score = 0.0;
    let result = compute_performance_score(&zero_cap, &catalog, 500_000_000.0, 1_000_000_000.0);
    assert_eq!(result, PerformanceScore::default());
}

#[test]
fn unsupported_method_scores_zero() {
    let catalog = standard_catalog();
    let mut ruleset = standard_ruleset("mois", "under_3b");
    ruleset.performance_method = PerformanceMethod::Unsupported;

    let result = compute_performance_score(&ruleset, &catalog, 650_000_000.0, 1_000_000_000.0);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.ratio, 0.0);
}
