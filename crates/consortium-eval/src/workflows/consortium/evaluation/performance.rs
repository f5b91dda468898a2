use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::catalog::{PerformanceMethod, Ruleset, ScoringCatalog};
use super::table::{score_or_base, LookupPolicy};

/// Consortium performance score and the ratio shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub score: f64,
    pub ratio: f64,
}

/// Convert weighted consortium performance into a score. An unsupported
/// method yields `(0, 0)`, which callers read as a misconfigured ruleset.
pub fn compute_performance_score(
    ruleset: &Ruleset,
    catalog: &ScoringCatalog,
    total_weighted_performance: f64,
    base_amount: f64,
) -> PerformanceScore {
    match ruleset.performance_method {
        PerformanceMethod::RatioTable => {
            let ratio = if base_amount > 0.0 {
                total_weighted_performance / base_amount * 100.0
            } else {
                0.0
            };
            let table = ruleset
                .performance_score_table_id
                .as_deref()
                .and_then(|id| catalog.score_table(id));
            let score = score_or_base(
                table,
                Some(ratio),
                LookupPolicy::HigherIsBetter,
                ruleset.performance_base_score,
            );

            PerformanceScore { score, ratio }
        }
        PerformanceMethod::DirectFormula => {
            let params = ruleset.performance_params;
            let denominator = base_amount * params.base_multiplier;
            if denominator <= 0.0 || params.max_score <= 0.0 {
                warn!(
                    ruleset = %ruleset.name,
                    base_amount,
                    "direct performance formula has no positive base; scoring zero"
                );
                return PerformanceScore::default();
            }

            let raw_score = total_weighted_performance / denominator * params.max_score;
            let score = raw_score.min(params.max_score);
            let ratio = score / params.max_score * 100.0;
            debug!(ruleset = %ruleset.name, raw_score, score, "direct performance score");

            PerformanceScore { score, ratio }
        }
        PerformanceMethod::Unsupported => {
            warn!(
                ruleset = %ruleset.name,
                "ruleset has no supported performance method; performance scores zero"
            );
            PerformanceScore::default()
        }
    }
}
