use std::path::PathBuf;

use serde_json::Value;
use tracing::info;

use crate::context::AppContext;
use crate::domain::takes::analyze_takes;
use crate::error::{AppError, AppResult};
use crate::services::TakesReportRow;

pub struct TakesReportOutcome {
    pub tests: usize,
    pub with_valid_answer: usize,
    pub output: PathBuf,
}

pub async fn run_takes_report(ctx: &AppContext) -> AppResult<TakesReportOutcome> {
    let input = &ctx.config.takes_input;
    info!(input = %input.display(), "reading take records");

    let bytes = tokio::fs::read(input)
        .await
        .map_err(|err| AppError::source_unavailable(input, err))?;
    let document: Value = serde_json::from_slice(&bytes).map_err(|err| {
        AppError::InvalidInput(format!("{} is not valid JSON: {err}", input.display()))
    })?;

    let outcomes = analyze_takes(&document)?;
    info!(total = outcomes.len(), "loaded test records");

    let rows: Vec<TakesReportRow> = outcomes.iter().map(TakesReportRow::from).collect();
    let with_valid_answer = outcomes
        .iter()
        .filter(|outcome| outcome.finished_with_valid_answer())
        .count();

    let output = ctx.config.takes_report.clone();
    ctx.report_sink.write_takes_report(&output, &rows).await?;
    info!(tests = rows.len(), with_valid_answer, output = %output.display(), "takes report written");

    Ok(TakesReportOutcome {
        tests: rows.len(),
        with_valid_answer,
        output,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::infra::csv_report::CsvReport;
    use crate::infra::fs::FsPatchSource;

    fn context(workspace: &Path) -> AppContext {
        let config = AppConfig::resolve(workspace, &StoredConfig::default(), |_| None).unwrap();
        let source = FsPatchSource::new(
            config.patches_root.clone(),
            config.patches_dir.clone(),
            config.patch_suffix.clone(),
        );
        AppContext::new(config, Arc::new(source), Arc::new(CsvReport::new()))
    }

    #[tokio::test]
    async fn writes_one_row_per_test() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("D4J.json"),
            r#"{
                "Lang_1": [[{"valid": false}], [{"valid": false}, {"valid": true}]],
                "Chart_4": [[{"valid": false}, {}]]
            }"#,
        )
        .unwrap();

        let outcome = run_takes_report(&context(dir.path())).await.unwrap();

        assert_eq!(outcome.tests, 2);
        assert_eq!(outcome.with_valid_answer, 1);
        let written = fs::read_to_string(outcome.output).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines[1], "Lang_1,2,Yes,2,2,3");
        assert_eq!(lines[2], "Chart_4,1,No,,,");
    }

    #[tokio::test]
    async fn missing_input_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_takes_report(&context(dir.path())).await.err().unwrap();
        assert!(err.is_source_unavailable());
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("D4J.json"), "{ broken").unwrap();
        let err = run_takes_report(&context(dir.path())).await.err().unwrap();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
