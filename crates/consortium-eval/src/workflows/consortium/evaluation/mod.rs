mod business;
mod catalog;
mod credit;
mod eligibility;
mod performance;
mod share;
mod table;

pub use business::{compute_business_score, BusinessScoreDetail, ScoreBasis};
pub use catalog::{
    CatalogError, CreditGradeTable, DirectFormulaParams, IndustryAverages, PerformanceMethod,
    RatioAlertThresholds, Ruleset, ScoringCatalog,
};
pub use credit::{classify, grade_score, CreditValidity};
pub use eligibility::{
    CapacityCheckResult, IndividualCapacityResult, SoloBidResult, SoloBidShortfall,
};
pub use performance::{compute_performance_score, PerformanceScore};
pub use share::{check_share_limits, ShareLimitResult};
pub use table::{LookupPolicy, ScoreTable, ScoreTier};

#[cfg(test)]
pub(crate) use business::parse_ratio_for_tests;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::amount::amount_or_zero;
use super::domain::{
    CapacityPolicy, ConsortiumMember, MemberRole, PriceData, RegionLimit, RuleKey,
};

/// Fixed price-evaluation score every bid is assumed to receive.
pub const BASELINE_BID_SCORE: f64 = 65.0;

/// Raised when an evaluation cannot start at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("no ruleset configured for {authority}/{tier}")]
    UnknownRuleset { authority: String, tier: String },
}

/// Everything an evaluation call needs besides the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub members: Vec<ConsortiumMember>,
    pub price_data: PriceData,
    pub announcement_date: NaiveDate,
    pub rule_key: RuleKey,
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,
    #[serde(default)]
    pub region_limit: RegionLimit,
}

/// Per-member inputs and business score as used by the consortium totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyEvaluation {
    pub role: MemberRole,
    pub name: String,
    pub region: String,
    pub industry: String,
    pub share: f64,
    pub business_score: BusinessScoreDetail,
    pub performance_5y: f64,
    pub capacity_rating: f64,
}

/// Outcome of one consortium evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsortiumEvaluationResult {
    pub rule_key: RuleKey,
    pub ruleset: Ruleset,
    pub company_details: Vec<CompanyEvaluation>,
    /// Share-weighted sum with shares as whole percentages, so a consortium of
    /// 8.0 at 60 and 6.0 at 40 scores 720, not 7.2.
    pub business_score: f64,
    pub total_weighted_performance: f64,
    pub performance_ratio: f64,
    pub performance_score: f64,
    pub total_score: f64,
    pub bid_score: f64,
    pub expected_score: f64,
    pub solo_bid_results: Vec<SoloBidResult>,
    pub capacity_check: CapacityCheckResult,
    pub individual_capacity_results: Vec<IndividualCapacityResult>,
    pub price_data: PriceData,
}

/// Stateless evaluator applying an injected catalog to consortium inputs.
#[derive(Debug, Clone)]
pub struct ConsortiumEvaluator {
    catalog: Arc<ScoringCatalog>,
}

impl ConsortiumEvaluator {
    pub fn new(catalog: Arc<ScoringCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ScoringCatalog {
        &self.catalog
    }

    pub fn evaluate_request(
        &self,
        request: &EvaluationRequest,
    ) -> Result<Option<ConsortiumEvaluationResult>, EvaluationError> {
        self.evaluate(
            &request.members,
            &request.price_data,
            request.announcement_date,
            &request.rule_key,
            &request.capacity_policy,
            &request.region_limit,
        )
    }

    /// Score a consortium. An unknown rule key is an error; empty members or
    /// price data produce no result.
    pub fn evaluate(
        &self,
        members: &[ConsortiumMember],
        price_data: &PriceData,
        announcement_date: NaiveDate,
        rule_key: &RuleKey,
        capacity_policy: &CapacityPolicy,
        region_limit: &RegionLimit,
    ) -> Result<Option<ConsortiumEvaluationResult>, EvaluationError> {
        let Some(ruleset) = self.catalog.ruleset(rule_key) else {
            warn!(%rule_key, "evaluation requested for unknown ruleset");
            return Err(EvaluationError::UnknownRuleset {
                authority: rule_key.authority.clone(),
                tier: rule_key.tier.clone(),
            });
        };

        if members.is_empty() || price_data.is_empty() {
            return Ok(None);
        }

        let base_amount = price_data.amount(&ruleset.performance_base_key);

        let company_details: Vec<CompanyEvaluation> = members
            .iter()
            .map(|member| {
                let company = &member.company;
                CompanyEvaluation {
                    role: member.role,
                    name: company.name.clone(),
                    region: company.region.clone(),
                    industry: member.industry.clone(),
                    share: member.share,
                    business_score: compute_business_score(
                        Some(company),
                        Some(member.industry.as_str()),
                        announcement_date,
                        ruleset,
                        &self.catalog,
                    ),
                    performance_5y: amount_or_zero(company.performance_5y.as_deref()),
                    capacity_rating: amount_or_zero(company.capacity_rating.as_deref()),
                }
            })
            .collect();

        let business_score: f64 = company_details
            .iter()
            .map(|company| company.business_score.total * company.share)
            .sum();

        let total_weighted_performance: f64 = company_details
            .iter()
            .map(|company| company.performance_5y * company.share)
            .sum();

        let performance = compute_performance_score(
            ruleset,
            &self.catalog,
            total_weighted_performance,
            base_amount,
        );

        let performance_target = base_amount * ruleset.performance_multiplier;
        let solo_bid_results = eligibility::solo_bid_results(
            &company_details,
            performance_target,
            region_limit,
            capacity_policy,
        );
        let capacity_check = eligibility::consortium_capacity_check(&company_details, capacity_policy);
        let individual_capacity_results = if rule_key.is_large_contract_tier() {
            eligibility::individual_capacity_results(
                &company_details,
                capacity_policy.total_capacity_requirement,
            )
        } else {
            Vec::new()
        };

        let total_score = business_score + performance.score;

        info!(
            %rule_key,
            members = company_details.len(),
            business_score,
            performance_score = performance.score,
            total_score,
            "consortium evaluated"
        );

        Ok(Some(ConsortiumEvaluationResult {
            rule_key: rule_key.clone(),
            ruleset: ruleset.clone(),
            company_details,
            business_score,
            total_weighted_performance,
            performance_ratio: performance.ratio,
            performance_score: performance.score,
            total_score,
            bid_score: BASELINE_BID_SCORE,
            expected_score: total_score + BASELINE_BID_SCORE,
            solo_bid_results,
            capacity_check,
            individual_capacity_results,
            price_data: price_data.clone(),
        }))
    }

    pub fn check_share_limits(
        &self,
        members: &[ConsortiumMember],
        total_capacity_requirement: f64,
    ) -> Vec<ShareLimitResult> {
        check_share_limits(members, total_capacity_requirement)
    }
}
