use serde::{Deserialize, Serialize};

use crate::workflows::consortium::amount::amount_or_zero;
use crate::workflows::consortium::domain::ConsortiumMember;

/// Claimed share against the largest share a member's capacity rating covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLimitResult {
    pub name: String,
    pub input_share: f64,
    pub max_share: f64,
    pub difference: f64,
    pub is_problem: bool,
}

/// Check each member's share, preserving input order. Empty when the contract
/// requirement is not positive.
pub fn check_share_limits(
    members: &[ConsortiumMember],
    total_capacity_requirement: f64,
) -> Vec<ShareLimitResult> {
    if total_capacity_requirement <= 0.0 {
        return Vec::new();
    }

    members
        .iter()
        .map(|member| {
            let capacity = amount_or_zero(member.company.capacity_rating.as_deref());
            let max_share = capacity / total_capacity_requirement * 100.0;
            ShareLimitResult {
                name: member.company.name.clone(),
                input_share: member.share,
                max_share,
                difference: max_share - member.share,
                is_problem: member.share > max_share,
            }
        })
        .collect()
}
