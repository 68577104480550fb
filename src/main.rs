mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::inspect::{self, InspectArgs};
use crate::cmd::patches::{self, PatchesArgs};
use crate::cmd::takes::{self, TakesArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::csv_report::CsvReport;
use crate::infra::fs::FsPatchSource;

#[derive(Parser)]
#[command(
    name = "patchstats",
    author,
    version,
    about = "Summarize program-repair patches and test takes as CSV reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count changed files, hunks and added/removed lines for every project patch.
    Patches(PatchesArgs),
    /// Report, per test, whether and when a valid take was found.
    Takes(TakesArgs),
    /// Print patch statistics for individual files.
    Inspect(InspectArgs),
    /// Manage the workspace configuration file.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Config(args) => config_cmd::run(&cwd, args.command),
        Commands::Inspect(args) => {
            let config = AppConfig::load(&cwd)?;
            inspect::run(&config, args).await
        }
        Commands::Patches(args) => {
            let mut config = AppConfig::load(&cwd)?;
            args.apply(&mut config)?;
            let context = build_context(config);

            let outcome = patches::run(&context).await?;
            println!("Analysis complete. Processed {} patch files.", outcome.analyzed);
            if outcome.skipped > 0 {
                println!("Skipped {} unreadable patch files.", outcome.skipped);
            }
            println!("Report saved to: {}", outcome.output.display());
            Ok(())
        }
        Commands::Takes(args) => {
            let mut config = AppConfig::load(&cwd)?;
            args.apply(&mut config);
            let context = build_context(config);

            let outcome = takes::run(&context).await?;
            println!(
                "Analysis complete. {} of {} tests finished with a valid answer.",
                outcome.with_valid_answer, outcome.tests
            );
            println!("Results saved to: {}", outcome.output.display());
            Ok(())
        }
    }
}

fn build_context(config: AppConfig) -> AppContext {
    let patch_source = Arc::new(FsPatchSource::new(
        config.patches_root.clone(),
        config.patches_dir.clone(),
        config.patch_suffix.clone(),
    ));
    AppContext::new(config, patch_source, Arc::new(CsvReport::new()))
}
