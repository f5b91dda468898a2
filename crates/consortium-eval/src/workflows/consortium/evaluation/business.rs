use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Ruleset, ScoringCatalog};
use super::credit::{classify, grade_score, CreditValidity};
use super::table::{score_or_base, LookupPolicy};
use crate::workflows::consortium::domain::{CompanyField, CompanyRecord, FieldFreshness};

/// Which path produced a company's business score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBasis {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "expired financial data")]
    ExpiredFinancialData,
    #[serde(rename = "data error")]
    DataError,
    #[serde(rename = "credit rating")]
    CreditRating,
    #[serde(rename = "financial ratio")]
    FinancialRatio,
}

impl ScoreBasis {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreBasis::Error => "error",
            ScoreBasis::ExpiredFinancialData => "expired financial data",
            ScoreBasis::DataError => "data error",
            ScoreBasis::CreditRating => "credit rating",
            ScoreBasis::FinancialRatio => "financial ratio",
        }
    }
}

/// Full breakdown of one company's business score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessScoreDetail {
    pub total: f64,
    pub debt_score: f64,
    pub current_score: f64,
    pub duration_score: f64,
    pub credit_score: f64,
    pub debt_vs_industry: Option<f64>,
    pub current_vs_industry: Option<f64>,
    pub basis: ScoreBasis,
    pub credit_valid: CreditValidity,
}

impl BusinessScoreDetail {
    fn zeroed(basis: ScoreBasis) -> Self {
        Self {
            total: 0.0,
            debt_score: 0.0,
            current_score: 0.0,
            duration_score: 0.0,
            credit_score: 0.0,
            debt_vs_industry: None,
            current_vs_industry: None,
            basis,
            credit_valid: CreditValidity::NoData,
        }
    }

    /// Score from debt, current and duration tables before the credit comparison.
    pub fn ratio_based_score(&self) -> f64 {
        self.debt_score + self.current_score + self.duration_score
    }
}

/// Compute a company's business score under `ruleset`.
pub fn compute_business_score(
    company: Option<&CompanyRecord>,
    industry: Option<&str>,
    announcement_date: NaiveDate,
    ruleset: &Ruleset,
    catalog: &ScoringCatalog,
) -> BusinessScoreDetail {
    let (Some(company), Some(averages)) = (company, industry.and_then(|name| catalog.industry(name)))
    else {
        return BusinessScoreDetail::zeroed(ScoreBasis::Error);
    };

    let rating = company.credit_rating.as_deref();

    if company.freshness_of(CompanyField::DebtRatio) != FieldFreshness::MostRecent
        || company.freshness_of(CompanyField::CurrentRatio) != FieldFreshness::MostRecent
    {
        return BusinessScoreDetail {
            credit_valid: classify(rating, announcement_date),
            ..BusinessScoreDetail::zeroed(ScoreBasis::ExpiredFinancialData)
        };
    }

    let (Some(debt_ratio), Some(current_ratio)) = (
        parse_ratio(company.debt_ratio.as_deref()),
        parse_ratio(company.current_ratio.as_deref()),
    ) else {
        return BusinessScoreDetail::zeroed(ScoreBasis::DataError);
    };

    let debt_vs_industry = versus_industry(debt_ratio, averages.debt_ratio.unwrap_or(100.0));
    let current_vs_industry =
        versus_industry(current_ratio, averages.current_ratio.unwrap_or(100.0));

    let debt_score = score_or_base(
        catalog.score_table(&ruleset.debt_score_table_id),
        Some(debt_vs_industry),
        LookupPolicy::LowerIsBetter,
        ruleset.debt_base_score,
    );
    let current_score = score_or_base(
        catalog.score_table(&ruleset.current_score_table_id),
        Some(current_vs_industry),
        LookupPolicy::HigherIsBetter,
        ruleset.current_base_score,
    );

    let duration_score = if ruleset.use_duration_score {
        duration_score(company.operating_duration.as_deref(), ruleset, catalog)
    } else {
        0.0
    };

    let ratio_based_score = debt_score + current_score + duration_score;
    let credit_score = grade_score(rating, ruleset, catalog);
    let credit_valid = classify(rating, announcement_date);

    let (total, basis) = if credit_valid == CreditValidity::Valid && credit_score > ratio_based_score
    {
        (credit_score, ScoreBasis::CreditRating)
    } else {
        (ratio_based_score, ScoreBasis::FinancialRatio)
    };

    debug!(
        company = %company.name,
        debt_vs_industry,
        current_vs_industry,
        debt_score,
        current_score,
        duration_score,
        credit_score,
        credit_valid = credit_valid.label(),
        basis = basis.label(),
        "business score computed"
    );

    BusinessScoreDetail {
        total,
        debt_score,
        current_score,
        duration_score,
        credit_score,
        debt_vs_industry: Some(debt_vs_industry),
        current_vs_industry: Some(current_vs_industry),
        basis,
        credit_valid,
    }
}

/// Ratio cells look like `"60%"` or `" 150.5 "`. A missing cell reads as zero;
/// a present but non-numeric one is a data error.
fn parse_ratio(raw: Option<&str>) -> Option<f64> {
    let Some(raw) = raw else {
        return Some(0.0);
    };
    raw.replace('%', "").trim().parse::<f64>().ok()
}

fn versus_industry(company_ratio: f64, industry_average: f64) -> f64 {
    if industry_average == 0.0 {
        0.0
    } else {
        company_ratio * 100.0 / industry_average
    }
}

/// Operating duration cells carry units (`"12.5 years"`); only digits and dots
/// are kept. Anything unparsable scores zero.
fn duration_score(raw: Option<&str>, ruleset: &Ruleset, catalog: &ScoringCatalog) -> f64 {
    let digits: String = raw
        .unwrap_or("0")
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    let Ok(years) = digits.parse::<f64>() else {
        return 0.0;
    };

    ruleset
        .duration_score_table_id
        .as_deref()
        .and_then(|id| catalog.score_table(id))
        .map_or(0.0, |table| {
            table.lookup(Some(years), LookupPolicy::HigherIsBetter)
        })
}

#[cfg(test)]
pub(crate) fn parse_ratio_for_tests(raw: Option<&str>) -> Option<f64> {
    parse_ratio(raw)
}
