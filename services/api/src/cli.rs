use crate::commands::{
    run_cache_health, run_cache_validate, run_qualify, run_savings, CacheHealthArgs,
    CacheValidateArgs, QualifyArgs, SavingsArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use usmca_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "usmca-compliance",
    about = "Evaluate USMCA qualification, estimate tariff savings, and gate the tariff rate cache",
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
    /// Evaluate regional value content for a bill of materials
    Qualify(QualifyArgs),
    /// Estimate annual savings from the USMCA preference
    Savings(SavingsArgs),
    /// Validate tariff cache exports or report on cache health
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// Walk through qualification, savings, and cache validation with sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Run every record of a CSV export through the write-time gate
    Validate(CacheValidateArgs),
    /// Run the whole-cache health checks over a CSV export
    Health(CacheHealthArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await.map(|()| ExitCode::SUCCESS),
        Command::Qualify(args) => run_qualify(args),
        Command::Savings(args) => run_savings(args),
        Command::Cache {
            command: CacheCommand::Validate(args),
        } => run_cache_validate(args),
        Command::Cache {
            command: CacheCommand::Health(args),
        } => run_cache_health(args),
        Command::Demo(args) => run_demo(args),
    }
}
