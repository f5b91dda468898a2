use chrono::NaiveDate;
use consortium_eval::error::AppError;
use consortium_eval::workflows::consortium::ScoringCatalog;
use consortium_eval::workflows::roster::CompanyRoster;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<ScoringCatalog>,
    pub(crate) roster: Option<Arc<CompanyRoster>>,
}

/// Built-in tables unless an alternate catalog file is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<ScoringCatalog, AppError> {
    match path {
        Some(path) => {
            let catalog = ScoringCatalog::from_path(path)?;
            info!(path = %path.display(), rulesets = catalog.rule_keys().len(), "scoring catalog loaded");
            Ok(catalog)
        }
        None => Ok(ScoringCatalog::standard()),
    }
}

pub(crate) fn load_roster(path: Option<&Path>) -> Result<Option<CompanyRoster>, AppError> {
    path.map(CompanyRoster::from_path)
        .transpose()
        .map_err(AppError::from)
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(file).map_err(|source| AppError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
