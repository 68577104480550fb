use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("source unavailable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("report error: {0}")]
    Report(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AppError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, AppError::SourceUnavailable { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
