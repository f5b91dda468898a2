use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use consortium_eval::workflows::consortium::{consortium_router, ConsortiumEvaluator};
use consortium_eval::workflows::roster::CompanySearchFilter;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Query string of `GET /api/v1/companies`. Amount bounds are in won.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CompaniesQuery {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) region: Option<String>,
    #[serde(default)]
    pub(crate) manager: Option<String>,
    #[serde(default)]
    pub(crate) min_capacity: Option<f64>,
    #[serde(default)]
    pub(crate) max_capacity: Option<f64>,
    #[serde(default)]
    pub(crate) min_3y: Option<f64>,
    #[serde(default)]
    pub(crate) max_3y: Option<f64>,
    #[serde(default)]
    pub(crate) min_5y: Option<f64>,
    #[serde(default)]
    pub(crate) max_5y: Option<f64>,
    /// Industry whose alert thresholds drive the ratio highlights.
    #[serde(default = "default_industry")]
    pub(crate) industry: String,
}

fn default_industry() -> String {
    "electric".to_string()
}

impl CompaniesQuery {
    fn filter(&self) -> CompanySearchFilter {
        CompanySearchFilter {
            name: self.name.clone(),
            region: self.region.clone(),
            manager: self.manager.clone(),
            min_capacity: self.min_capacity,
            max_capacity: self.max_capacity,
            min_3y: self.min_3y,
            max_3y: self.max_3y,
            min_5y: self.min_5y,
            max_5y: self.max_5y,
        }
    }
}

pub(crate) fn with_consortium_routes(evaluator: Arc<ConsortiumEvaluator>) -> axum::Router {
    consortium_router(evaluator)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/companies", axum::routing::get(companies_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn companies_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<CompaniesQuery>,
) -> Response {
    let Some(roster) = state.roster.as_ref() else {
        let payload = json!({ "error": "no company roster loaded" });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let listings = roster.listings(&query.filter(), &query.industry, &state.catalog);
    (StatusCode::OK, Json(listings)).into_response()
}
