//! Consortium bid scoring: per-company business scores, consortium
//! performance, and the eligibility checks announced with a tender.

pub mod amount;
pub mod domain;
pub mod evaluation;
pub mod router;

#[cfg(test)]
mod tests;

pub use amount::{format_won, parse_amount};
pub use domain::{
    CapacityMethod, CapacityPolicy, CompanyField, CompanyRecord, ConsortiumMember,
    FieldFreshness, MemberRole, PriceData, RegionLimit, RuleKey, ESTIMATED_PRICE,
    NOTICE_BASE_AMOUNT,
};
pub use evaluation::{
    check_share_limits, BusinessScoreDetail, CapacityCheckResult, CatalogError,
    ConsortiumEvaluationResult, ConsortiumEvaluator, CreditValidity, EvaluationError,
    EvaluationRequest, IndividualCapacityResult, PerformanceMethod, PerformanceScore, Ruleset,
    ScoreBasis, ScoringCatalog, ShareLimitResult, SoloBidResult, SoloBidShortfall,
    BASELINE_BID_SCORE,
};
pub use router::{consortium_router, ShareLimitRequest};
