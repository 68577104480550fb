use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::takes::{TakesReportOutcome, run_takes_report};

#[derive(Args, Debug, Clone, Default)]
pub struct TakesArgs {
    /// JSON file mapping each test to its rounds of takes.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// CSV file to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl TakesArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.takes_input = config.workspace_path(input);
        }
        if let Some(output) = &self.output {
            config.takes_report = config.workspace_path(output);
        }
    }
}

pub async fn run(ctx: &AppContext) -> AppResult<TakesReportOutcome> {
    run_takes_report(ctx).await
}
