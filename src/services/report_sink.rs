use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::patch::{PatchLocation, PatchStats};
use crate::domain::takes::TestOutcome;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchReportRow {
    pub identifier: String,
    pub files_changed: u64,
    pub edit_locations: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
}

impl PatchReportRow {
    pub fn new(location: &PatchLocation, stats: PatchStats) -> Self {
        Self {
            identifier: location.identifier(),
            files_changed: stats.files_changed,
            edit_locations: stats.edit_locations,
            lines_added: stats.lines_added,
            lines_removed: stats.lines_removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TakesReportRow {
    pub test_name: String,
    pub num_rounds: usize,
    pub finished_with_valid_answer: &'static str,
    pub valid_answer_round: Option<usize>,
    pub takes_in_valid_round: Option<usize>,
    pub total_takes_for_valid: Option<usize>,
}

impl From<&TestOutcome> for TakesReportRow {
    fn from(outcome: &TestOutcome) -> Self {
        let answer = outcome.valid_answer;
        Self {
            test_name: outcome.test_name.clone(),
            num_rounds: outcome.num_rounds,
            finished_with_valid_answer: if answer.is_some() { "Yes" } else { "No" },
            valid_answer_round: answer.map(|a| a.round),
            takes_in_valid_round: answer.map(|a| a.take_in_round),
            total_takes_for_valid: answer.map(|a| a.total_takes),
        }
    }
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write_patch_report(&self, output: &Path, rows: &[PatchReportRow]) -> AppResult<()>;
    async fn write_takes_report(&self, output: &Path, rows: &[TakesReportRow]) -> AppResult<()>;
}
