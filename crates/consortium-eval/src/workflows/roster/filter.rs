use crate::workflows::consortium::{parse_amount, CompanyRecord, ScoringCatalog};
use serde::{Deserialize, Serialize};

/// Roster search criteria. Every criterion is optional; an empty filter
/// matches every company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanySearchFilter {
    #[serde(default)]
    pub name: Option<String>,
    /// Exact region; `all` matches any region.
    #[serde(default)]
    pub region: Option<String>,
    /// Substring of the manager note.
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub min_capacity: Option<f64>,
    #[serde(default)]
    pub max_capacity: Option<f64>,
    #[serde(default)]
    pub min_3y: Option<f64>,
    #[serde(default)]
    pub max_3y: Option<f64>,
    #[serde(default)]
    pub min_5y: Option<f64>,
    #[serde(default)]
    pub max_5y: Option<f64>,
}

impl CompanySearchFilter {
    pub fn matches(&self, company: &CompanyRecord) -> bool {
        if let Some(name) = non_blank(&self.name) {
            if !contains_ignore_case(&company.name, name) {
                return false;
            }
        }

        if let Some(region) = non_blank(&self.region) {
            if !region.eq_ignore_ascii_case("all") && company.region.trim() != region {
                return false;
            }
        }

        if let Some(manager) = non_blank(&self.manager) {
            let note = company.manager_note.as_deref().unwrap_or_default();
            if !contains_ignore_case(note, manager) {
                return false;
            }
        }

        within_bounds(
            company.capacity_rating.as_deref(),
            self.min_capacity,
            self.max_capacity,
        ) && within_bounds(company.performance_3y.as_deref(), self.min_3y, self.max_3y)
            && within_bounds(company.performance_5y.as_deref(), self.min_5y, self.max_5y)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Once any bound is set, an amount that does not parse excludes the company.
fn within_bounds(raw: Option<&str>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    let Some(amount) = raw.and_then(parse_amount) else {
        return false;
    };

    min.map_or(true, |min| amount >= min) && max.map_or(true, |max| amount <= max)
}

/// Highlights for financial ratios outside the industry's comfort band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioFlags {
    pub debt_ratio_high: bool,
    pub current_ratio_low: bool,
}

/// Flag a company's raw ratios against the catalog's alert thresholds for
/// `industry`. Unknown industries and unparsable ratios raise no flag.
pub fn ratio_flags(company: &CompanyRecord, industry: &str, catalog: &ScoringCatalog) -> RatioFlags {
    let Some(thresholds) = catalog.ratio_alert(industry) else {
        return RatioFlags::default();
    };

    let debt = percentage(company.debt_ratio.as_deref());
    let current = percentage(company.current_ratio.as_deref());

    RatioFlags {
        debt_ratio_high: debt.is_some_and(|value| value > thresholds.debt_ratio_above),
        current_ratio_low: current
            .is_some_and(|value| value <= thresholds.current_ratio_at_or_below),
    }
}

fn percentage(raw: Option<&str>) -> Option<f64> {
    raw?.replace('%', "").trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(name: &str, region: &str, capacity: Option<&str>) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            region: region.to_string(),
            capacity_rating: capacity.map(str::to_string),
            manager_note: Some("Kim (site lead)".to_string()),
            ..CompanyRecord::default()
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = CompanySearchFilter::default();
        assert!(filter.matches(&listed("Hanbit Electric", "Seoul", None)));
    }

    #[test]
    fn name_and_manager_match_case_insensitively() {
        let company = listed("Hanbit Electric", "Seoul", None);

        let filter = CompanySearchFilter {
            name: Some("hanbit".to_string()),
            manager: Some("KIM".to_string()),
            ..CompanySearchFilter::default()
        };
        assert!(filter.matches(&company));

        let filter = CompanySearchFilter {
            manager: Some("park".to_string()),
            ..CompanySearchFilter::default()
        };
        assert!(!filter.matches(&company));
    }

    #[test]
    fn region_all_matches_any_region() {
        let company = listed("Daon Telecom", "Busan", None);

        let all = CompanySearchFilter {
            region: Some("all".to_string()),
            ..CompanySearchFilter::default()
        };
        assert!(all.matches(&company));

        let seoul = CompanySearchFilter {
            region: Some("Seoul".to_string()),
            ..CompanySearchFilter::default()
        };
        assert!(!seoul.matches(&company));
    }

    #[test]
    fn amount_bounds_exclude_unparsable_amounts() {
        let filter = CompanySearchFilter {
            min_capacity: Some(1_000_000_000.0),
            max_capacity: Some(5_000_000_000.0),
            ..CompanySearchFilter::default()
        };

        assert!(filter.matches(&listed("A", "Seoul", Some("30억"))));
        assert!(!filter.matches(&listed("B", "Seoul", Some("60억"))));
        assert!(!filter.matches(&listed("C", "Seoul", Some("5000만"))));
        assert!(!filter.matches(&listed("D", "Seoul", Some("pending"))));
        assert!(!filter.matches(&listed("E", "Seoul", None)));
    }

    #[test]
    fn ratio_flags_follow_industry_thresholds() {
        let catalog = ScoringCatalog::standard();
        let mut company = listed("Hanbit Electric", "Seoul", None);
        company.debt_ratio = Some("70%".to_string());
        company.current_ratio = Some("213.87".to_string());

        let flags = ratio_flags(&company, "electric", &catalog);
        assert!(flags.debt_ratio_high);
        assert!(flags.current_ratio_low);

        company.debt_ratio = Some("62.02".to_string());
        company.current_ratio = Some("250%".to_string());
        assert_eq!(ratio_flags(&company, "electric", &catalog), RatioFlags::default());

        assert_eq!(ratio_flags(&company, "plumbing", &catalog), RatioFlags::default());
    }
}
