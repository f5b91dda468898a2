use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::catalog::{Ruleset, ScoringCatalog};

/// Validity of a credit rating's evaluation window on the announcement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditValidity {
    #[default]
    NoData,
    FormatError,
    Valid,
    Expired,
}

impl CreditValidity {
    pub const fn label(self) -> &'static str {
        match self {
            CreditValidity::NoData => "no data",
            CreditValidity::FormatError => "format error",
            CreditValidity::Valid => "valid",
            CreditValidity::Expired => "expired",
        }
    }
}

fn window_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\((\d{2,4}[./-]\d{1,2}[./-]\d{1,2})~(\d{2,4}[./-]\d{1,2}[./-]\d{1,2})\)")
            .expect("valid rating window pattern")
    })
}

/// Classify a rating such as `"BBB0 (24.06.30~25.06.29)"` against the
/// announcement date. Both window bounds are inclusive.
pub fn classify(rating: Option<&str>, announcement_date: NaiveDate) -> CreditValidity {
    let Some(rating) = rating.filter(|value| !value.trim().is_empty()) else {
        return CreditValidity::NoData;
    };

    let compact: String = rating.chars().filter(|ch| *ch != ' ').collect();
    let Some(window) = window_pattern().captures(&compact) else {
        return CreditValidity::FormatError;
    };

    let (Some(start), Some(end)) = (parse_window_date(&window[1]), parse_window_date(&window[2]))
    else {
        return CreditValidity::FormatError;
    };

    if start <= announcement_date && announcement_date <= end {
        CreditValidity::Valid
    } else {
        CreditValidity::Expired
    }
}

/// Accepts `YYYY` or `YY` years with `.`, `/` or `-` used consistently.
fn parse_window_date(raw: &str) -> Option<NaiveDate> {
    let year_digits = raw.chars().take_while(char::is_ascii_digit).count();
    let year_spec = match year_digits {
        4 => "%Y",
        2 => "%y",
        _ => return None,
    };

    ['.', '/', '-'].iter().find_map(|separator| {
        let format = format!("{year_spec}{separator}%m{separator}%d");
        NaiveDate::parse_from_str(raw, &format).ok()
    })
}

/// Score the grade token (first whitespace-delimited word, uppercased) using
/// the ruleset's credit table. Unknown grades and missing tables score zero.
pub fn grade_score(rating: Option<&str>, ruleset: &Ruleset, catalog: &ScoringCatalog) -> f64 {
    let Some(grade) = rating
        .and_then(|value| value.split_whitespace().next())
        .map(str::to_uppercase)
    else {
        return 0.0;
    };

    ruleset
        .credit_score_table_id
        .as_deref()
        .and_then(|id| catalog.credit_table(id))
        .and_then(|table| table.get(&grade))
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::consortium::domain::RuleKey;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let rating = Some("BBB0 (2024.06.30~2025.06.29)");
        assert_eq!(classify(rating, date(2024, 6, 30)), CreditValidity::Valid);
        assert_eq!(classify(rating, date(2025, 6, 29)), CreditValidity::Valid);
        assert_eq!(classify(rating, date(2024, 6, 29)), CreditValidity::Expired);
        assert_eq!(classify(rating, date(2025, 6, 30)), CreditValidity::Expired);
    }

    #[test]
    fn accepts_two_digit_years_and_every_separator() {
        let announcement = date(2025, 1, 15);
        for rating in [
            "A0 (24.06.30~25.06.29)",
            "A0 (24/06/30~25/06/29)",
            "A0 (2024-06-30~2025-06-29)",
            "A0 ( 24. 6. 30 ~ 25. 6. 29 )",
        ] {
            assert_eq!(
                classify(Some(rating), announcement),
                CreditValidity::Valid,
                "{rating}"
            );
        }
    }

    #[test]
    fn missing_window_is_a_format_error_even_with_a_good_grade() {
        assert_eq!(
            classify(Some("AA+"), date(2025, 1, 1)),
            CreditValidity::FormatError
        );
        assert_eq!(
            classify(Some("AA+ 2024.06.30~2025.06.29"), date(2025, 1, 1)),
            CreditValidity::FormatError
        );
    }

    #[test]
    fn impossible_or_mixed_dates_are_format_errors() {
        assert_eq!(
            classify(Some("B+ (2024.13.01~2025.01.01)"), date(2024, 6, 1)),
            CreditValidity::FormatError
        );
        assert_eq!(
            classify(Some("B+ (2024.06/30~2025.06.29)"), date(2024, 7, 1)),
            CreditValidity::FormatError
        );
        assert_eq!(
            classify(Some("B+ (202.06.30~2025.06.29)"), date(2024, 7, 1)),
            CreditValidity::FormatError
        );
    }

    #[test]
    fn blank_ratings_have_no_data() {
        assert_eq!(classify(None, date(2025, 1, 1)), CreditValidity::NoData);
        assert_eq!(classify(Some("  "), date(2025, 1, 1)), CreditValidity::NoData);
    }

    #[test]
    fn grade_score_uses_the_first_token_case_insensitively() {
        let catalog = ScoringCatalog::standard();
        let ruleset = catalog
            .ruleset(&RuleKey::new("mois", "under_3b"))
            .expect("builtin ruleset");

        assert_eq!(
            grade_score(Some("bb- (24.01.01~24.12.31)"), ruleset, &catalog),
            14.0
        );
        assert_eq!(grade_score(Some("B0\n(expired)"), ruleset, &catalog), 13.0);
        assert_eq!(grade_score(Some("Z9"), ruleset, &catalog), 0.0);
        assert_eq!(grade_score(None, ruleset, &catalog), 0.0);
    }

    #[test]
    fn grade_score_is_zero_without_a_credit_table() {
        let catalog = ScoringCatalog::standard();
        let ruleset = catalog
            .ruleset(&RuleKey::new("mois", "over_3b"))
            .expect("builtin ruleset");
        assert_eq!(grade_score(Some("AAA"), ruleset, &catalog), 0.0);
    }
}
