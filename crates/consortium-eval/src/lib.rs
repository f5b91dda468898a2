//! Scoring and eligibility evaluation for procurement bid consortia.
//!
//! The engine lives under [`workflows::consortium`]; rule tables are supplied
//! as an injected [`ScoringCatalog`](workflows::consortium::ScoringCatalog).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
