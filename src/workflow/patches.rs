use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::patch::PatchStats;
use crate::error::AppResult;
use crate::services::PatchReportRow;

pub struct PatchReportOutcome {
    pub analyzed: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

/// Extracts stats for every discovered patch and writes one report row per readable file.
///
/// Files are read and counted concurrently, one task each, with at most
/// `read_concurrency` patches in memory at once. Rows keep discovery order.
/// A patch that cannot be read is logged and skipped; any other failure aborts the run.
pub async fn analyze_patches(ctx: &AppContext) -> AppResult<PatchReportOutcome> {
    info!(root = %ctx.config.patches_root.display(), "scanning patch directory");
    let locations = ctx.patch_source.discover().await?;
    debug!(count = locations.len(), "discovered patch files");

    let limit = Arc::new(Semaphore::new(ctx.config.read_concurrency));
    let tasks: Vec<_> = locations
        .into_iter()
        .map(|location| {
            let source = Arc::clone(&ctx.patch_source);
            let limit = Arc::clone(&limit);
            tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = limit.acquire_owned().await.ok();
                let stats = source
                    .read(&location)
                    .await
                    .map(|bytes| PatchStats::from_bytes(&bytes));
                (location, stats)
            })
        })
        .collect();

    let mut rows = Vec::with_capacity(tasks.len());
    let mut skipped = 0;
    for task in tasks {
        let (location, stats) = task.await?;
        match stats {
            Ok(stats) => rows.push(PatchReportRow::new(&location, stats)),
            Err(err) if err.is_source_unavailable() => {
                warn!(path = %location.path.display(), error = %err, "skipping unreadable patch");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    let output = ctx.config.patch_report.clone();
    ctx.report_sink.write_patch_report(&output, &rows).await?;
    info!(analyzed = rows.len(), skipped, output = %output.display(), "patch report written");

    Ok(PatchReportOutcome {
        analyzed: rows.len(),
        skipped,
        output,
    })
}
