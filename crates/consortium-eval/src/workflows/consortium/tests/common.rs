use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::consortium::domain::{
    CapacityMethod, CapacityPolicy, CompanyField, CompanyRecord, ConsortiumMember,
    FieldFreshness, MemberRole, PriceData, RegionLimit, RuleKey, ESTIMATED_PRICE,
    NOTICE_BASE_AMOUNT,
};
use crate::workflows::consortium::evaluation::{
    ConsortiumEvaluator, EvaluationRequest, IndustryAverages, PerformanceMethod, Ruleset,
    ScoreTable, ScoreTier, ScoringCatalog,
};

pub(super) fn announcement() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid announcement date")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Company whose debt and current ratios are both freshly reported.
pub(super) fn company(name: &str, region: &str, debt: &str, current: &str) -> CompanyRecord {
    let mut freshness = BTreeMap::new();
    freshness.insert(CompanyField::DebtRatio, FieldFreshness::MostRecent);
    freshness.insert(CompanyField::CurrentRatio, FieldFreshness::MostRecent);

    CompanyRecord {
        name: name.to_string(),
        region: region.to_string(),
        debt_ratio: Some(debt.to_string()),
        current_ratio: Some(current.to_string()),
        freshness,
        ..CompanyRecord::default()
    }
}

pub(super) fn member(role: MemberRole, share: f64, company: CompanyRecord) -> ConsortiumMember {
    ConsortiumMember {
        role,
        share,
        industry: "electric".to_string(),
        company,
    }
}

pub(super) fn standard_catalog() -> ScoringCatalog {
    ScoringCatalog::standard()
}

pub(super) fn standard_ruleset(authority: &str, tier: &str) -> Ruleset {
    standard_catalog()
        .ruleset(&RuleKey::new(authority, tier))
        .cloned()
        .expect("builtin ruleset")
}

pub(super) fn standard_evaluator() -> ConsortiumEvaluator {
    ConsortiumEvaluator::new(Arc::new(standard_catalog()))
}

/// Catalog whose business score depends on the debt ratio alone: 8.0 below
/// 50% of the industry average, 6.0 otherwise.
pub(super) fn flat_catalog() -> ScoringCatalog {
    let ruleset = Ruleset {
        name: "flat debt only".to_string(),
        use_duration_score: false,
        performance_method: PerformanceMethod::RatioTable,
        performance_base_key: ESTIMATED_PRICE.to_string(),
        performance_multiplier: 0.8,
        debt_score_table_id: "flat_debt".to_string(),
        current_score_table_id: "missing_current".to_string(),
        duration_score_table_id: None,
        credit_score_table_id: None,
        performance_score_table_id: Some("mois_default_performance".to_string()),
        debt_base_score: 0.0,
        current_base_score: 0.0,
        performance_base_score: 1.0,
        performance_params: Default::default(),
    };

    let mut catalog = standard_catalog();
    let mut tiers = BTreeMap::new();
    tiers.insert("under_3b".to_string(), ruleset.clone());
    tiers.insert("over_3b".to_string(), ruleset);
    catalog.rulesets.insert("test".to_string(), tiers);
    catalog.score_tables.insert(
        "flat_debt".to_string(),
        ScoreTable::new(vec![ScoreTier::new(50.0, 8.0), ScoreTier::unbounded(6.0)]),
    );
    catalog.industry_averages.insert(
        "electric".to_string(),
        IndustryAverages {
            debt_ratio: Some(100.0),
            current_ratio: Some(100.0),
        },
    );
    catalog
}

pub(super) fn flat_evaluator() -> ConsortiumEvaluator {
    ConsortiumEvaluator::new(Arc::new(flat_catalog()))
}

pub(super) fn price_data() -> PriceData {
    PriceData::default()
        .with(ESTIMATED_PRICE, 1_000_000_000.0)
        .with(NOTICE_BASE_AMOUNT, 1_100_000_000.0)
}

/// Lead: strong, Seoul based, 30억 capacity. Partner: weak, Busan based.
pub(super) fn two_member_consortium() -> Vec<ConsortiumMember> {
    let mut lead = company("Hanbit Electric", "Seoul", "40%", "120%");
    lead.performance_5y = Some("10억".to_string());
    lead.capacity_rating = Some("30억".to_string());

    let mut partner = company("Daon Telecom", "Busan", "80%", "90%");
    partner.performance_5y = Some("5억".to_string());
    partner.capacity_rating = Some("10억".to_string());

    vec![
        member(MemberRole::Lead, 60.0, lead),
        member(MemberRole::Partner, 40.0, partner),
    ]
}

pub(super) fn limited_capacity(method: CapacityMethod) -> CapacityPolicy {
    CapacityPolicy {
        is_limited: true,
        limit_amount: 2_000_000_000.0,
        method,
        total_capacity_requirement: 4_000_000_000.0,
    }
}

pub(super) fn evaluation_request(rule_key: RuleKey) -> EvaluationRequest {
    EvaluationRequest {
        members: two_member_consortium(),
        price_data: price_data(),
        announcement_date: announcement(),
        rule_key,
        capacity_policy: limited_capacity(CapacityMethod::Ratio),
        region_limit: RegionLimit("Seoul".to_string()),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
