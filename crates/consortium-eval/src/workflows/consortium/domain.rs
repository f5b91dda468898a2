use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Recency of a roster field, resolved by the ingestion side before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFreshness {
    MostRecent,
    OneYearElapsed,
    OverOneYearElapsed,
    #[default]
    Unspecified,
    NotApplicable,
}

impl FieldFreshness {
    pub const fn label(self) -> &'static str {
        match self {
            FieldFreshness::MostRecent => "most recent",
            FieldFreshness::OneYearElapsed => "one year elapsed",
            FieldFreshness::OverOneYearElapsed => "over one year elapsed",
            FieldFreshness::Unspecified => "unspecified",
            FieldFreshness::NotApplicable => "not applicable",
        }
    }
}

/// Roster fields that carry their own freshness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    CapacityRating,
    Performance3y,
    Performance5y,
    DebtRatio,
    CurrentRatio,
    OperatingDuration,
    CreditRating,
}

/// Company snapshot as delivered by the roster ingestion. Numeric cells are kept
/// as the raw text the roster holds; the engine parses them where needed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub representative: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub debt_ratio: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub current_ratio: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub operating_duration: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub credit_rating: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub capacity_rating: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub performance_3y: Option<String>,
    #[serde(default, deserialize_with = "raw_cell")]
    pub performance_5y: Option<String>,
    #[serde(default)]
    pub manager_note: Option<String>,
    #[serde(default)]
    pub freshness: BTreeMap<CompanyField, FieldFreshness>,
}

impl CompanyRecord {
    pub fn freshness_of(&self, field: CompanyField) -> FieldFreshness {
        self.freshness.get(&field).copied().unwrap_or_default()
    }

    /// Collapse the capacity and performance freshness into one roster badge.
    pub fn summary_freshness(&self) -> FieldFreshness {
        let key_fields = [
            self.freshness_of(CompanyField::CapacityRating),
            self.freshness_of(CompanyField::Performance3y),
            self.freshness_of(CompanyField::Performance5y),
        ];

        if key_fields.contains(&FieldFreshness::OverOneYearElapsed) {
            FieldFreshness::OverOneYearElapsed
        } else if key_fields.contains(&FieldFreshness::OneYearElapsed) {
            FieldFreshness::OneYearElapsed
        } else if key_fields
            .iter()
            .all(|status| *status == FieldFreshness::MostRecent)
        {
            FieldFreshness::MostRecent
        } else {
            FieldFreshness::Unspecified
        }
    }
}

/// Position a company takes in the consortium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Lead,
    #[default]
    Partner,
}

impl MemberRole {
    pub const fn label(self) -> &'static str {
        match self {
            MemberRole::Lead => "lead",
            MemberRole::Partner => "partner",
        }
    }
}

fn default_industry() -> String {
    "electric".to_string()
}

/// One participant of a consortium. Shares are whole percentages and are
/// expected, but not required, to sum to 100 across members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsortiumMember {
    #[serde(default)]
    pub role: MemberRole,
    pub share: f64,
    #[serde(default = "default_industry")]
    pub industry: String,
    pub company: CompanyRecord,
}

/// Identifies a ruleset by issuing authority and contract-size tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub authority: String,
    pub tier: String,
}

impl RuleKey {
    pub fn new(authority: impl Into<String>, tier: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            tier: tier.into(),
        }
    }

    /// Tiers named `over_<amount>` are the large-contract thresholds that
    /// require each member to cover its share of the contract individually.
    pub fn is_large_contract_tier(&self) -> bool {
        self.tier.starts_with("over_")
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.authority, self.tier)
    }
}

pub const ESTIMATED_PRICE: &str = "estimation_price";
pub const NOTICE_BASE_AMOUNT: &str = "notice_base_amount";

/// Announced price figures keyed by name (`estimation_price`,
/// `notice_base_amount`, ...). Rulesets pick which one anchors performance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceData(pub BTreeMap<String, f64>);

impl PriceData {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn amount(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn with(mut self, key: impl Into<String>, amount: f64) -> Self {
        self.0.insert(key.into(), amount);
        self
    }
}

/// How member capacity ratings combine for the consortium-wide floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMethod {
    /// Each member's rating scaled by `share / 100`.
    #[default]
    Ratio,
    /// Ratings summed unweighted.
    Sum,
}

impl CapacityMethod {
    pub const fn label(self) -> &'static str {
        match self {
            CapacityMethod::Ratio => "ratio method",
            CapacityMethod::Sum => "sum method",
        }
    }
}

/// Capacity-rating constraints announced with the tender.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacityPolicy {
    #[serde(default)]
    pub is_limited: bool,
    #[serde(default)]
    pub limit_amount: f64,
    #[serde(default)]
    pub method: CapacityMethod,
    /// Contract amount each member must cover in proportion to its share on
    /// large-contract tiers.
    #[serde(default)]
    pub total_capacity_requirement: f64,
}

/// Regional restriction on solo bidding. `all` (or blank) means unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionLimit(pub String);

impl RegionLimit {
    pub fn all() -> Self {
        Self("all".to_string())
    }

    pub fn is_unrestricted(&self) -> bool {
        let value = self.0.trim();
        value.is_empty() || value.eq_ignore_ascii_case("all")
    }

    pub fn admits(&self, region: &str) -> bool {
        self.is_unrestricted() || region.contains(self.0.trim())
    }
}

impl Default for RegionLimit {
    fn default() -> Self {
        Self::all()
    }
}

/// Roster cells may arrive as JSON numbers or strings; keep both as text.
fn raw_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
