use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::ConsortiumMember;
use super::evaluation::{ConsortiumEvaluator, EvaluationError, EvaluationRequest};

/// Body of a share-limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLimitRequest {
    pub members: Vec<ConsortiumMember>,
    pub total_capacity_requirement: f64,
}

/// Router builder exposing the evaluation engine over HTTP.
pub fn consortium_router(evaluator: Arc<ConsortiumEvaluator>) -> Router {
    Router::new()
        .route("/api/v1/consortium/evaluate", post(evaluate_handler))
        .route("/api/v1/consortium/share-limits", post(share_limits_handler))
        .route("/api/v1/rulesets", get(rulesets_handler))
        .with_state(evaluator)
}

pub(crate) async fn evaluate_handler(
    State(evaluator): State<Arc<ConsortiumEvaluator>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response {
    match evaluator.evaluate_request(&request) {
        Ok(Some(result)) => (StatusCode::OK, axum::Json(result)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "members and price data are required",
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ EvaluationError::UnknownRuleset { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn share_limits_handler(
    State(evaluator): State<Arc<ConsortiumEvaluator>>,
    axum::Json(request): axum::Json<ShareLimitRequest>,
) -> Response {
    let results =
        evaluator.check_share_limits(&request.members, request.total_capacity_requirement);
    (StatusCode::OK, axum::Json(results)).into_response()
}

pub(crate) async fn rulesets_handler(
    State(evaluator): State<Arc<ConsortiumEvaluator>>,
) -> Response {
    let rulesets: Vec<_> = evaluator
        .catalog()
        .rule_keys()
        .into_iter()
        .map(|(key, name)| {
            json!({
                "authority": key.authority,
                "tier": key.tier,
                "name": name,
            })
        })
        .collect();
    (StatusCode::OK, axum::Json(rulesets)).into_response()
}
