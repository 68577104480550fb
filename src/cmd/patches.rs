use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::patches::{PatchReportOutcome, analyze_patches};

#[derive(Args, Debug, Clone, Default)]
pub struct PatchesArgs {
    /// Directory holding one subdirectory per project.
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// CSV file to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Only files ending with this suffix are analyzed.
    #[arg(long)]
    pub suffix: Option<String>,
    /// Name of the per-project directory containing patch files.
    #[arg(long)]
    pub patches_dir: Option<String>,
    /// Maximum number of patch files read at the same time.
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl PatchesArgs {
    pub fn apply(&self, config: &mut AppConfig) -> AppResult<()> {
        if let Some(root) = &self.root {
            config.patches_root = config.workspace_path(root);
        }
        if let Some(output) = &self.output {
            config.patch_report = config.workspace_path(output);
        }
        if let Some(suffix) = &self.suffix {
            config.patch_suffix = suffix.clone();
        }
        if let Some(dir) = &self.patches_dir {
            config.patches_dir = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            config.read_concurrency = jobs;
        }
        config.validate()
    }
}

pub async fn run(ctx: &AppContext) -> AppResult<PatchReportOutcome> {
    analyze_patches(ctx).await
}
