use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::patch::PatchStats;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Print a JSON array instead of one line per file.
    #[arg(long)]
    pub json: bool,
    /// Patch files to analyze.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectEntry {
    pub path: String,
    pub stats: PatchStats,
}

/// Unreadable files are warned about and skipped unless none could be read.
pub async fn inspect_files(config: &AppConfig, files: &[PathBuf]) -> AppResult<Vec<InspectEntry>> {
    let mut entries = Vec::with_capacity(files.len());
    let mut first_error = None;

    for file in files {
        let path = config.workspace_path(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) => entries.push(InspectEntry {
                path: file.display().to_string(),
                stats: PatchStats::from_bytes(&bytes),
            }),
            Err(err) => {
                let err = AppError::source_unavailable(path, err);
                warn!(error = %err, "skipping unreadable patch");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) if entries.is_empty() => Err(err),
        _ => Ok(entries),
    }
}

pub async fn run(config: &AppConfig, args: InspectArgs) -> AppResult<()> {
    let entries = inspect_files(config, &args.files).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|err| AppError::Report(format!("failed to encode stats: {err}")))?;
        println!("{json}");
    } else {
        for entry in &entries {
            let stats = entry.stats;
            println!(
                "{} files={} hunks={} added={} removed={}",
                entry.path,
                stats.files_changed,
                stats.edit_locations,
                stats.lines_added,
                stats.lines_removed
            );
        }
    }
    Ok(())
}
