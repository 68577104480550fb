use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::services::{PatchReportRow, ReportSink, TakesReportRow};

const PATCH_HEADER: [&str; 5] = [
    "identifier",
    "files_changed",
    "edit_locations",
    "lines_added",
    "lines_removed",
];

const TAKES_HEADER: [&str; 6] = [
    "test_name",
    "num_rounds",
    "finished_with_valid_answer",
    "valid_answer_round",
    "takes_in_valid_round",
    "total_takes_for_valid",
];

/// Writes reports as comma-separated files, header first even when there are no rows.
pub struct CsvReport;

impl CsvReport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportSink for CsvReport {
    async fn write_patch_report(&self, output: &Path, rows: &[PatchReportRow]) -> AppResult<()> {
        write_in_background(output, &PATCH_HEADER, rows).await
    }

    async fn write_takes_report(&self, output: &Path, rows: &[TakesReportRow]) -> AppResult<()> {
        write_in_background(output, &TAKES_HEADER, rows).await
    }
}

async fn write_in_background<T>(
    output: &Path,
    header: &'static [&'static str],
    rows: &[T],
) -> AppResult<()>
where
    T: Serialize + Clone + Send + 'static,
{
    let output: PathBuf = output.to_path_buf();
    let rows = rows.to_vec();
    tokio::task::spawn_blocking(move || write_rows(&output, header, &rows)).await?
}

fn write_rows<T: Serialize>(output: &Path, header: &[&str], rows: &[T]) -> AppResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let report_error =
        |err: csv::Error| AppError::Report(format!("{}: {err}", output.display()));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output)
        .map_err(report_error)?;
    writer.write_record(header).map_err(report_error)?;
    for row in rows {
        writer.serialize(row).map_err(report_error)?;
    }
    writer.flush()?;
    Ok(())
}
