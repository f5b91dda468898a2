use crate::workflows::consortium::{CompanyField, CompanyRecord, FieldFreshness};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::warn;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        if row.name.trim().is_empty() {
            continue;
        }
        records.push(row.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    representative: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    debt_ratio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    current_ratio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    operating_duration: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    credit_rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    capacity_rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    performance_3y: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    performance_5y: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    manager_note: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    debt_ratio_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    current_ratio_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    operating_duration_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    credit_rating_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    capacity_rating_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    performance_3y_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    performance_5y_status: Option<String>,
}

impl RosterRow {
    fn into_record(self) -> CompanyRecord {
        let mut freshness = BTreeMap::new();
        for (field, status) in [
            (CompanyField::DebtRatio, &self.debt_ratio_status),
            (CompanyField::CurrentRatio, &self.current_ratio_status),
            (CompanyField::OperatingDuration, &self.operating_duration_status),
            (CompanyField::CreditRating, &self.credit_rating_status),
            (CompanyField::CapacityRating, &self.capacity_rating_status),
            (CompanyField::Performance3y, &self.performance_3y_status),
            (CompanyField::Performance5y, &self.performance_5y_status),
        ] {
            if let Some(raw) = status.as_deref() {
                freshness.insert(field, parse_freshness(&self.name, raw));
            }
        }

        CompanyRecord {
            name: self.name.trim().to_string(),
            region: self.region.trim().to_string(),
            representative: self.representative,
            debt_ratio: self.debt_ratio,
            current_ratio: self.current_ratio,
            operating_duration: self.operating_duration,
            credit_rating: self.credit_rating,
            capacity_rating: self.capacity_rating,
            performance_3y: self.performance_3y,
            performance_5y: self.performance_5y,
            manager_note: self.manager_note,
            freshness,
        }
    }
}

/// Accepts the snake_case wire names as well as their spaced labels.
fn parse_freshness(company: &str, raw: &str) -> FieldFreshness {
    let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "most_recent" | "current" => FieldFreshness::MostRecent,
        "one_year_elapsed" => FieldFreshness::OneYearElapsed,
        "over_one_year_elapsed" => FieldFreshness::OverOneYearElapsed,
        "n/a" | "na" | "not_applicable" => FieldFreshness::NotApplicable,
        "unspecified" => FieldFreshness::Unspecified,
        _ => {
            warn!(company, status = raw, "unrecognized freshness status in roster");
            FieldFreshness::Unspecified
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn parse_freshness_for_tests(raw: &str) -> FieldFreshness {
    parse_freshness("test", raw)
}
