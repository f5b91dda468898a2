use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::table::{ScoreTable, ScoreTier};
use crate::workflows::consortium::domain::{RuleKey, ESTIMATED_PRICE, NOTICE_BASE_AMOUNT};

/// Selects how consortium performance becomes a score. Names the engine does
/// not know deserialize to `Unsupported`, which scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMethod {
    RatioTable,
    #[serde(rename = "direct_formula_v1", alias = "direct_formula")]
    DirectFormula,
    #[default]
    #[serde(other)]
    Unsupported,
}

/// Parameters of the direct performance formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectFormulaParams {
    #[serde(default = "default_multiplier")]
    pub base_multiplier: f64,
    #[serde(default = "default_max_performance_score")]
    pub max_score: f64,
}

impl Default for DirectFormulaParams {
    fn default() -> Self {
        Self {
            base_multiplier: default_multiplier(),
            max_score: default_max_performance_score(),
        }
    }
}

/// Scoring configuration for one `(authority, tier)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub use_duration_score: bool,
    #[serde(default)]
    pub performance_method: PerformanceMethod,
    #[serde(default = "default_base_key")]
    pub performance_base_key: String,
    #[serde(default = "default_multiplier")]
    pub performance_multiplier: f64,
    #[serde(default = "default_debt_table")]
    pub debt_score_table_id: String,
    #[serde(default = "default_current_table")]
    pub current_score_table_id: String,
    #[serde(default)]
    pub duration_score_table_id: Option<String>,
    #[serde(default)]
    pub credit_score_table_id: Option<String>,
    #[serde(default)]
    pub performance_score_table_id: Option<String>,
    #[serde(default)]
    pub debt_base_score: f64,
    #[serde(default)]
    pub current_base_score: f64,
    #[serde(default)]
    pub performance_base_score: f64,
    #[serde(default)]
    pub performance_params: DirectFormulaParams,
}

fn default_multiplier() -> f64 {
    1.0
}
fn default_max_performance_score() -> f64 {
    15.0
}
fn default_base_key() -> String {
    ESTIMATED_PRICE.to_string()
}
fn default_debt_table() -> String {
    "default_debt".to_string()
}
fn default_current_table() -> String {
    "default_current".to_string()
}

/// Industry-wide averages the company ratios are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndustryAverages {
    #[serde(default)]
    pub debt_ratio: Option<f64>,
    #[serde(default)]
    pub current_ratio: Option<f64>,
}

/// Display thresholds used to highlight weak ratios in roster listings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioAlertThresholds {
    pub debt_ratio_above: f64,
    pub current_ratio_at_or_below: f64,
}

/// Credit grade (e.g. `BBB+`) to score.
pub type CreditGradeTable = BTreeMap<String, f64>;

/// Every table the engine reads, loaded once and shared by reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringCatalog {
    pub rulesets: BTreeMap<String, BTreeMap<String, Ruleset>>,
    #[serde(default)]
    pub score_tables: BTreeMap<String, ScoreTable>,
    #[serde(default)]
    pub credit_tables: BTreeMap<String, CreditGradeTable>,
    #[serde(default)]
    pub industry_averages: BTreeMap<String, IndustryAverages>,
    #[serde(default)]
    pub ratio_alerts: BTreeMap<String, RatioAlertThresholds>,
}

/// Failure to load an alternate catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rule catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoringCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn ruleset(&self, key: &RuleKey) -> Option<&Ruleset> {
        self.rulesets
            .get(&key.authority)
            .and_then(|tiers| tiers.get(&key.tier))
    }

    /// All configured rule keys with their display names, in key order.
    pub fn rule_keys(&self) -> Vec<(RuleKey, &str)> {
        self.rulesets
            .iter()
            .flat_map(|(authority, tiers)| {
                tiers.iter().map(move |(tier, ruleset)| {
                    (RuleKey::new(authority.clone(), tier.clone()), ruleset.name.as_str())
                })
            })
            .collect()
    }

    pub fn score_table(&self, id: &str) -> Option<&ScoreTable> {
        self.score_tables.get(id)
    }

    pub fn credit_table(&self, id: &str) -> Option<&CreditGradeTable> {
        self.credit_tables.get(id)
    }

    pub fn industry(&self, industry: &str) -> Option<&IndustryAverages> {
        self.industry_averages.get(industry)
    }

    pub fn ratio_alert(&self, industry: &str) -> Option<&RatioAlertThresholds> {
        self.ratio_alerts.get(industry)
    }

    /// Built-in tables for the Ministry of the Interior and Safety (`mois`) and
    /// the Public Procurement Service (`pps`), with 2024 industry averages.
    pub fn standard() -> Self {
        let mut rulesets = BTreeMap::new();

        let mut mois = BTreeMap::new();
        mois.insert(
            "under_3b".to_string(),
            Ruleset {
                name: "MOIS under 3 billion".to_string(),
                use_duration_score: false,
                performance_method: PerformanceMethod::RatioTable,
                performance_base_key: ESTIMATED_PRICE.to_string(),
                performance_multiplier: 0.8,
                debt_score_table_id: "mois_under_3b_debt".to_string(),
                current_score_table_id: "mois_under_3b_current".to_string(),
                duration_score_table_id: None,
                credit_score_table_id: Some("mois_default_credit".to_string()),
                performance_score_table_id: Some("mois_default_performance".to_string()),
                debt_base_score: 4.8,
                current_base_score: 4.2,
                performance_base_score: 1.0,
                performance_params: DirectFormulaParams::default(),
            },
        );
        mois.insert(
            "over_3b".to_string(),
            Ruleset {
                name: "MOIS 3 billion and over".to_string(),
                use_duration_score: true,
                performance_method: PerformanceMethod::RatioTable,
                performance_base_key: ESTIMATED_PRICE.to_string(),
                performance_multiplier: 0.8,
                debt_score_table_id: "mois_over_3b_debt".to_string(),
                current_score_table_id: "mois_over_3b_current".to_string(),
                duration_score_table_id: Some("mois_over_3b_duration".to_string()),
                credit_score_table_id: None,
                performance_score_table_id: Some("mois_default_performance".to_string()),
                debt_base_score: 4.8,
                current_base_score: 4.2,
                performance_base_score: 1.0,
                performance_params: DirectFormulaParams::default(),
            },
        );
        rulesets.insert("mois".to_string(), mois);

        let mut pps = BTreeMap::new();
        pps.insert(
            "under_5b".to_string(),
            Ruleset {
                name: "PPS under 5 billion".to_string(),
                use_duration_score: false,
                performance_method: PerformanceMethod::DirectFormula,
                performance_base_key: NOTICE_BASE_AMOUNT.to_string(),
                performance_multiplier: 1.0,
                debt_score_table_id: "pps_under_5b_debt".to_string(),
                current_score_table_id: "pps_under_5b_current".to_string(),
                duration_score_table_id: None,
                credit_score_table_id: Some("pps_default_credit".to_string()),
                performance_score_table_id: None,
                debt_base_score: 4.2,
                current_base_score: 4.0,
                performance_base_score: 10.0,
                performance_params: DirectFormulaParams::default(),
            },
        );
        rulesets.insert("pps".to_string(), pps);

        let debt_tiers = |scores: [f64; 5]| {
            ScoreTable::new(vec![
                ScoreTier::new(50.0, scores[0]),
                ScoreTier::new(75.0, scores[1]),
                ScoreTier::new(100.0, scores[2]),
                ScoreTier::new(125.0, scores[3]),
                ScoreTier::unbounded(scores[4]),
            ])
        };
        let current_tiers = |scores: [f64; 5]| {
            ScoreTable::new(vec![
                ScoreTier::new(150.0, scores[0]),
                ScoreTier::new(120.0, scores[1]),
                ScoreTier::new(100.0, scores[2]),
                ScoreTier::new(70.0, scores[3]),
                ScoreTier::unbounded(scores[4]),
            ])
        };

        let mut score_tables = BTreeMap::new();
        score_tables.insert(
            "mois_under_3b_debt".to_string(),
            debt_tiers([8.0, 7.2, 6.4, 5.6, 4.8]),
        );
        score_tables.insert(
            "mois_under_3b_current".to_string(),
            current_tiers([7.0, 6.3, 5.6, 4.9, 4.2]),
        );
        score_tables.insert(
            "mois_over_3b_debt".to_string(),
            debt_tiers([7.0, 6.3, 5.6, 4.9, 4.2]),
        );
        score_tables.insert(
            "mois_over_3b_current".to_string(),
            current_tiers([7.0, 6.3, 5.6, 4.9, 4.2]),
        );
        score_tables.insert(
            "pps_under_5b_debt".to_string(),
            debt_tiers([7.0, 6.2, 5.4, 4.6, 3.8]),
        );
        score_tables.insert(
            "pps_under_5b_current".to_string(),
            current_tiers([7.0, 6.2, 5.4, 4.6, 3.8]),
        );
        score_tables.insert(
            "mois_over_3b_duration".to_string(),
            ScoreTable::new(vec![
                ScoreTier::new(20.0, 3.0),
                ScoreTier::new(15.0, 2.8),
                ScoreTier::new(10.0, 2.5),
                ScoreTier::new(5.0, 2.2),
            ]),
        );
        score_tables.insert(
            "mois_default_performance".to_string(),
            ScoreTable::new(vec![
                ScoreTier::new(80.0, 15.0),
                ScoreTier::new(70.0, 13.0),
                ScoreTier::new(60.0, 11.0),
                ScoreTier::new(50.0, 9.0),
                ScoreTier::new(40.0, 7.0),
                ScoreTier::new(30.0, 5.0),
                ScoreTier::new(20.0, 3.0),
                ScoreTier::unbounded(1.0),
            ]),
        );

        let mut credit_tables = BTreeMap::new();
        credit_tables.insert("mois_default_credit".to_string(), standard_credit_grades());
        credit_tables.insert("pps_default_credit".to_string(), standard_credit_grades());

        let mut industry_averages = BTreeMap::new();
        for (industry, debt, current) in [
            ("electric", 124.41, 142.58),
            ("telecom", 124.03, 140.06),
            ("firefighting", 110.08, 139.32),
        ] {
            industry_averages.insert(
                industry.to_string(),
                IndustryAverages {
                    debt_ratio: Some(debt),
                    current_ratio: Some(current),
                },
            );
        }

        let mut ratio_alerts = BTreeMap::new();
        for (industry, debt, current) in [
            ("electric", 62.02, 213.87),
            ("telecom", 62.01, 210.09),
            ("firefighting", 55.54, 208.98),
        ] {
            ratio_alerts.insert(
                industry.to_string(),
                RatioAlertThresholds {
                    debt_ratio_above: debt,
                    current_ratio_at_or_below: current,
                },
            );
        }

        Self {
            rulesets,
            score_tables,
            credit_tables,
            industry_averages,
            ratio_alerts,
        }
    }
}

fn standard_credit_grades() -> CreditGradeTable {
    let mut grades = BTreeMap::new();
    for grade in [
        "AAA", "AA+", "AA0", "AA-", "A+", "A0", "A-", "BBB+", "BBB0", "BBB-", "BB+", "BB0",
    ] {
        grades.insert(grade.to_string(), 15.0);
    }
    grades.insert("BB-".to_string(), 14.0);
    for grade in ["B+", "B0", "B-"] {
        grades.insert(grade.to_string(), 13.0);
    }
    for grade in ["CCC+", "CCC0", "CCC-", "CC", "C", "D"] {
        grades.insert(grade.to_string(), 10.0);
    }
    grades
}
