use async_trait::async_trait;

use crate::domain::patch::PatchLocation;
use crate::error::AppResult;

#[async_trait]
pub trait PatchSource: Send + Sync {
    /// Lists patch files in the order they should be reported.
    async fn discover(&self) -> AppResult<Vec<PatchLocation>>;
    /// Returns raw patch bytes, or `AppError::SourceUnavailable` if the file cannot be read.
    async fn read(&self, location: &PatchLocation) -> AppResult<Vec<u8>>;
}
