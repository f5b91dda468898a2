use crate::demo::{
    run_companies, run_demo, run_evaluate, run_rules, run_share_limits, CompaniesArgs, DemoArgs,
    EvaluateArgs, RulesArgs, ShareLimitArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use consortium_eval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Consortium Evaluator",
    about = "Score procurement bid consortia and check member eligibility",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a consortium described in a JSON request file
    Evaluate(EvaluateArgs),
    /// Check member shares against their capacity ratings
    ShareLimits(ShareLimitArgs),
    /// List the rulesets available in the scoring catalog
    Rules(RulesArgs),
    /// Search a company roster CSV
    Companies(CompaniesArgs),
    /// Evaluate a built-in sample consortium under every ruleset
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Scoring catalog JSON to use instead of the built-in tables
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Company roster CSV served from /api/v1/companies
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::ShareLimits(args) => run_share_limits(args),
        Command::Rules(args) => run_rules(args),
        Command::Companies(args) => run_companies(args),
        Command::Demo(args) => run_demo(args),
    }
}
