use serde::{Deserialize, Serialize};

use super::CompanyEvaluation;
use crate::workflows::consortium::amount::format_won;
use crate::workflows::consortium::domain::{
    CapacityMethod, CapacityPolicy, MemberRole, RegionLimit,
};

/// Why a member cannot bid on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoloBidShortfall {
    InsufficientPerformance { required: f64, actual: f64 },
    RegionMismatch { required: String, actual: String },
    InsufficientCapacity { required: f64, actual: f64 },
}

impl SoloBidShortfall {
    pub fn summary(&self) -> String {
        match self {
            SoloBidShortfall::InsufficientPerformance { required, .. } => {
                format!("insufficient performance (required: {} won)", format_won(*required))
            }
            SoloBidShortfall::RegionMismatch { required, .. } => {
                format!("region mismatch (required: {required})")
            }
            SoloBidShortfall::InsufficientCapacity { required, .. } => {
                format!(
                    "insufficient capacity rating (required: {} won)",
                    format_won(*required)
                )
            }
        }
    }
}

/// Whether a member could win the tender alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoloBidResult {
    pub name: String,
    pub role: MemberRole,
    pub possible: bool,
    pub shortfalls: Vec<SoloBidShortfall>,
    pub reason: String,
}

/// Consortium-wide capacity rating floor outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityCheckResult {
    pub passed: bool,
    pub evaluated_amount: Option<f64>,
    pub message: String,
}

/// Per-member capacity requirement on large-contract tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualCapacityResult {
    pub name: String,
    pub passed: bool,
    pub required_amount: f64,
    pub held_amount: f64,
    pub message: String,
}

pub(crate) fn solo_bid_results(
    companies: &[CompanyEvaluation],
    performance_target: f64,
    region_limit: &RegionLimit,
    capacity: &CapacityPolicy,
) -> Vec<SoloBidResult> {
    companies
        .iter()
        .map(|company| {
            let mut shortfalls = Vec::new();

            if company.performance_5y < performance_target {
                shortfalls.push(SoloBidShortfall::InsufficientPerformance {
                    required: performance_target,
                    actual: company.performance_5y,
                });
            }
            if !region_limit.admits(&company.region) {
                shortfalls.push(SoloBidShortfall::RegionMismatch {
                    required: region_limit.0.clone(),
                    actual: company.region.clone(),
                });
            }
            if capacity.is_limited && company.capacity_rating < capacity.limit_amount {
                shortfalls.push(SoloBidShortfall::InsufficientCapacity {
                    required: capacity.limit_amount,
                    actual: company.capacity_rating,
                });
            }

            let reason = if shortfalls.is_empty() {
                "performance, region and capacity rating all satisfied".to_string()
            } else {
                shortfalls
                    .iter()
                    .map(SoloBidShortfall::summary)
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            SoloBidResult {
                name: company.name.clone(),
                role: company.role,
                possible: shortfalls.is_empty(),
                shortfalls,
                reason,
            }
        })
        .collect()
}

pub(crate) fn consortium_capacity_check(
    companies: &[CompanyEvaluation],
    capacity: &CapacityPolicy,
) -> CapacityCheckResult {
    if !capacity.is_limited {
        return CapacityCheckResult {
            passed: true,
            evaluated_amount: None,
            message: "no capacity rating limit".to_string(),
        };
    }

    let evaluated: f64 = companies
        .iter()
        .map(|company| match capacity.method {
            CapacityMethod::Ratio => company.capacity_rating * (company.share / 100.0),
            CapacityMethod::Sum => company.capacity_rating,
        })
        .sum();

    let passed = evaluated >= capacity.limit_amount;
    let message = if passed {
        format!(
            "capacity rating satisfied ({}) - evaluated: {} won, required: {} won",
            capacity.method.label(),
            format_won(evaluated),
            format_won(capacity.limit_amount)
        )
    } else {
        format!(
            "capacity rating not satisfied ({}) - required: {} won, evaluated: {} won",
            capacity.method.label(),
            format_won(capacity.limit_amount),
            format_won(evaluated)
        )
    };

    CapacityCheckResult {
        passed,
        evaluated_amount: Some(evaluated),
        message,
    }
}

pub(crate) fn individual_capacity_results(
    companies: &[CompanyEvaluation],
    total_capacity_requirement: f64,
) -> Vec<IndividualCapacityResult> {
    if total_capacity_requirement <= 0.0 {
        return Vec::new();
    }

    companies
        .iter()
        .map(|company| {
            let required_amount = total_capacity_requirement * (company.share / 100.0);
            IndividualCapacityResult {
                name: company.name.clone(),
                passed: company.capacity_rating >= required_amount,
                required_amount,
                held_amount: company.capacity_rating,
                message: format!(
                    "required contract amount: {} won, capacity rating held: {} won",
                    format_won(required_amount),
                    format_won(company.capacity_rating)
                ),
            }
        })
        .collect()
}
