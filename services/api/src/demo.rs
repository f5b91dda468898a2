use crate::infra::{load_catalog, read_json_file};
use chrono::{Local, NaiveDate};
use clap::Args;
use consortium_eval::error::AppError;
use consortium_eval::workflows::consortium::{
    format_won, CapacityMethod, CapacityPolicy, CompanyField, CompanyRecord,
    ConsortiumEvaluationResult, ConsortiumEvaluator, ConsortiumMember, EvaluationRequest,
    FieldFreshness, MemberRole, PriceData, RegionLimit, ShareLimitRequest,
    ShareLimitResult, ESTIMATED_PRICE, NOTICE_BASE_AMOUNT,
};
use consortium_eval::workflows::roster::{CompanyRoster, CompanySearchFilter};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding an evaluation request
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Scoring catalog JSON to use instead of the built-in tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShareLimitArgs {
    /// JSON file holding members and the total capacity requirement
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Scoring catalog JSON to use instead of the built-in tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CompaniesArgs {
    /// Company roster CSV export
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Case-insensitive company name fragment
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Region to restrict to (`all` for every region)
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Case-insensitive manager note fragment
    #[arg(long)]
    pub(crate) manager: Option<String>,
    /// Minimum capacity rating in won
    #[arg(long)]
    pub(crate) min_capacity: Option<f64>,
    /// Maximum capacity rating in won
    #[arg(long)]
    pub(crate) max_capacity: Option<f64>,
    /// Minimum 3-year performance in won
    #[arg(long)]
    pub(crate) min_3y: Option<f64>,
    /// Maximum 3-year performance in won
    #[arg(long)]
    pub(crate) max_3y: Option<f64>,
    /// Minimum 5-year performance in won
    #[arg(long)]
    pub(crate) min_5y: Option<f64>,
    /// Maximum 5-year performance in won
    #[arg(long)]
    pub(crate) max_5y: Option<f64>,
    /// Industry whose alert thresholds drive the ratio highlights
    #[arg(long, default_value = "electric")]
    pub(crate) industry: String,
    /// Scoring catalog JSON to use instead of the built-in tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Announcement date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) announcement_date: Option<NaiveDate>,
    /// Scoring catalog JSON to use instead of the built-in tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let request: EvaluationRequest = read_json_file(&args.request)?;
    let evaluator = ConsortiumEvaluator::new(Arc::new(load_catalog(args.rules.as_deref())?));

    match evaluator.evaluate_request(&request)? {
        Some(result) if args.json => print_json(&result),
        Some(result) => render_evaluation(&result),
        None => println!("Nothing to evaluate: members and price data are required."),
    }

    Ok(())
}

pub(crate) fn run_share_limits(args: ShareLimitArgs) -> Result<(), AppError> {
    let request: ShareLimitRequest = read_json_file(&args.request)?;
    let evaluator = ConsortiumEvaluator::new(Arc::new(load_catalog(None)?));
    let results =
        evaluator.check_share_limits(&request.members, request.total_capacity_requirement);

    if args.json {
        print_json(&results);
    } else {
        render_share_limits(&results, request.total_capacity_requirement);
    }
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.rules.as_deref())?;
    println!("Available rulesets");
    for (key, name) in catalog.rule_keys() {
        let large = if key.is_large_contract_tier() {
            " (individual capacity checks)"
        } else {
            ""
        };
        println!("- {key}: {name}{large}");
    }
    Ok(())
}

pub(crate) fn run_companies(args: CompaniesArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.rules.as_deref())?;
    let roster = CompanyRoster::from_path(&args.roster)?;
    let filter = CompanySearchFilter {
        name: args.name,
        region: args.region,
        manager: args.manager,
        min_capacity: args.min_capacity,
        max_capacity: args.max_capacity,
        min_3y: args.min_3y,
        max_3y: args.max_3y,
        min_5y: args.min_5y,
        max_5y: args.max_5y,
    };

    let listings = roster.listings(&filter, &args.industry, &catalog);
    println!(
        "{} of {} companies match",
        listings.len(),
        roster.len()
    );
    for listing in &listings {
        let company = &listing.company;
        let mut flags = Vec::new();
        if listing.ratio_flags.debt_ratio_high {
            flags.push("high debt ratio");
        }
        if listing.ratio_flags.current_ratio_low {
            flags.push("low current ratio");
        }
        println!(
            "- {} [{}] capacity {} | 5y performance {} | data {}{}",
            company.name,
            company.region,
            company.capacity_rating.as_deref().unwrap_or("-"),
            company.performance_5y.as_deref().unwrap_or("-"),
            listing.summary_freshness.label(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" | {}", flags.join(", "))
            }
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let announcement_date = args
        .announcement_date
        .unwrap_or_else(|| Local::now().date_naive());
    let catalog = Arc::new(load_catalog(args.rules.as_deref())?);
    let evaluator = ConsortiumEvaluator::new(catalog.clone());

    println!("Consortium evaluation demo (announced {announcement_date})");
    let members = demo_members(announcement_date);
    let price_data = demo_price_data();
    let capacity_policy = CapacityPolicy {
        is_limited: true,
        limit_amount: 2_000_000_000.0,
        method: CapacityMethod::Ratio,
        total_capacity_requirement: 4_000_000_000.0,
    };
    let region_limit = RegionLimit("Seoul".to_string());

    for (key, _) in catalog.rule_keys() {
        println!();
        match evaluator.evaluate(
            &members,
            &price_data,
            announcement_date,
            &key,
            &capacity_policy,
            &region_limit,
        ) {
            Ok(Some(result)) => render_evaluation(&result),
            Ok(None) => println!("{key}: nothing to evaluate"),
            Err(err) => println!("{key}: {err}"),
        }
    }

    println!();
    let shares =
        evaluator.check_share_limits(&members, capacity_policy.total_capacity_requirement);
    render_share_limits(&shares, capacity_policy.total_capacity_requirement);

    Ok(())
}

fn render_evaluation(result: &ConsortiumEvaluationResult) {
    println!("Ruleset {} ({})", result.rule_key, result.ruleset.name);
    println!("Members:");
    for company in &result.company_details {
        let detail = &company.business_score;
        println!(
            "  - {} {} [{}] share {:.1}% | business {:.2} via {} (debt {:.2}, current {:.2}, duration {:.2}, credit {:.2} {})",
            company.role.label(),
            company.name,
            company.region,
            company.share,
            detail.total,
            detail.basis.label(),
            detail.debt_score,
            detail.current_score,
            detail.duration_score,
            detail.credit_score,
            detail.credit_valid.label()
        );
    }
    println!(
        "Business score {:.2} | performance {:.2} ({:.1}% of base) | total {:.2}",
        result.business_score,
        result.performance_score,
        result.performance_ratio,
        result.total_score
    );
    println!(
        "Expected score {:.2} (bid score {:.0})",
        result.expected_score, result.bid_score
    );

    println!("Solo bid eligibility:");
    for solo in &result.solo_bid_results {
        let verdict = if solo.possible { "possible" } else { "not possible" };
        println!("  - {}: {} ({})", solo.name, verdict, solo.reason);
    }

    let capacity = &result.capacity_check;
    println!(
        "Capacity check: {} - {}",
        if capacity.passed { "pass" } else { "fail" },
        capacity.message
    );

    if !result.individual_capacity_results.is_empty() {
        println!("Individual capacity:");
        for individual in &result.individual_capacity_results {
            println!(
                "  - {}: {} ({})",
                individual.name,
                if individual.passed { "pass" } else { "fail" },
                individual.message
            );
        }
    }
}

fn render_share_limits(results: &[ShareLimitResult], total_capacity_requirement: f64) {
    if results.is_empty() {
        println!("Share limits: no capacity requirement set");
        return;
    }

    println!(
        "Share limits against {} won requirement:",
        format_won(total_capacity_requirement)
    );
    for result in results {
        println!(
            "  - {}: claimed {:.1}% | max {:.1}% | margin {:+.1}%{}",
            result.name,
            result.input_share,
            result.max_share,
            result.difference,
            if result.is_problem { " | over limit" } else { "" }
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render result: {err}"),
    }
}

fn demo_price_data() -> PriceData {
    PriceData::default()
        .with(ESTIMATED_PRICE, 1_000_000_000.0)
        .with(NOTICE_BASE_AMOUNT, 1_100_000_000.0)
}

fn demo_members(announcement_date: NaiveDate) -> Vec<ConsortiumMember> {
    let rating_window = format!(
        "A0 ({}~{})",
        (announcement_date - chrono::Duration::days(180)).format("%Y.%m.%d"),
        (announcement_date + chrono::Duration::days(185)).format("%Y.%m.%d")
    );

    vec![
        ConsortiumMember {
            role: MemberRole::Lead,
            share: 60.0,
            industry: "electric".to_string(),
            company: demo_company(
                "Hanbit Electric",
                "Seoul",
                ["45.2%", "180.4%", "18 years"],
                ["30억", "9억 5000만", "12억"],
                Some(rating_window),
            ),
        },
        ConsortiumMember {
            role: MemberRole::Partner,
            share: 40.0,
            industry: "electric".to_string(),
            company: demo_company(
                "Daon Telecom",
                "Busan",
                ["88.0%", "95.5%", "7 years"],
                ["10억", "3억", "5억"],
                None,
            ),
        },
    ]
}

fn demo_company(
    name: &str,
    region: &str,
    [debt, current, duration]: [&str; 3],
    [capacity, performance_3y, performance_5y]: [&str; 3],
    credit_rating: Option<String>,
) -> CompanyRecord {
    let freshness: BTreeMap<CompanyField, FieldFreshness> = [
        CompanyField::DebtRatio,
        CompanyField::CurrentRatio,
        CompanyField::CapacityRating,
        CompanyField::Performance3y,
        CompanyField::Performance5y,
    ]
    .into_iter()
    .map(|field| (field, FieldFreshness::MostRecent))
    .collect();

    CompanyRecord {
        name: name.to_string(),
        region: region.to_string(),
        debt_ratio: Some(debt.to_string()),
        current_ratio: Some(current.to_string()),
        operating_duration: Some(duration.to_string()),
        credit_rating,
        capacity_rating: Some(capacity.to_string()),
        performance_3y: Some(performance_3y.to_string()),
        performance_5y: Some(performance_5y.to_string()),
        freshness,
        ..CompanyRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consortium_eval::workflows::consortium::{CreditValidity, RuleKey, ScoringCatalog};

    #[test]
    fn demo_members_evaluate_under_every_builtin_ruleset() {
        let announcement_date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let evaluator = ConsortiumEvaluator::new(Arc::new(ScoringCatalog::standard()));
        let members = demo_members(announcement_date);

        for (key, _) in evaluator.catalog().rule_keys() {
            let request = EvaluationRequest {
                members: members.clone(),
                price_data: demo_price_data(),
                announcement_date,
                rule_key: key.clone(),
                capacity_policy: CapacityPolicy::default(),
                region_limit: RegionLimit::all(),
            };
            let result = evaluator
                .evaluate_request(&request)
                .expect("builtin ruleset")
                .expect("non-empty input");
            assert_eq!(result.company_details.len(), 2, "{key}");
            assert!(result.total_score > 0.0, "{key}");
        }
    }

    #[test]
    fn demo_credit_window_covers_the_announcement() {
        let announcement_date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let evaluator = ConsortiumEvaluator::new(Arc::new(ScoringCatalog::standard()));
        let request = EvaluationRequest {
            members: demo_members(announcement_date),
            price_data: demo_price_data(),
            announcement_date,
            rule_key: RuleKey::new("mois", "under_3b"),
            capacity_policy: CapacityPolicy::default(),
            region_limit: RegionLimit::all(),
        };

        let result = evaluator
            .evaluate_request(&request)
            .expect("builtin ruleset")
            .expect("non-empty input");
        assert_eq!(
            result.company_details[0].business_score.credit_valid,
            CreditValidity::Valid
        );
    }

    #[test]
    fn unknown_rule_key_fails_the_evaluate_command() {
        let announcement_date = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        let request = EvaluationRequest {
            members: demo_members(announcement_date),
            price_data: demo_price_data(),
            announcement_date,
            rule_key: RuleKey::new("nope", "under_3b"),
            capacity_policy: CapacityPolicy::default(),
            region_limit: RegionLimit::all(),
        };
        let path = std::env::temp_dir().join("consortium-eval-unknown-rule-key.json");
        std::fs::write(&path, serde_json::to_string(&request).expect("request serializes"))
            .expect("write request");

        let outcome = run_evaluate(EvaluateArgs {
            request: path.clone(),
            rules: None,
            json: true,
        });
        std::fs::remove_file(&path).ok();

        let error = outcome.expect_err("unknown rule key");
        assert!(matches!(error, AppError::Evaluation(_)));
        assert_eq!(
            error.to_string(),
            "evaluation rejected: no ruleset configured for nope/under_3b"
        );
    }
}
