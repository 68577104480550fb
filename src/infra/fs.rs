use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::patch::PatchLocation;
use crate::error::{AppError, AppResult};
use crate::services::PatchSource;

/// Reads patches laid out as `<root>/<project>/<patches_dir>/*<suffix>`.
pub struct FsPatchSource {
    root: PathBuf,
    patches_dir: String,
    suffix: String,
}

impl FsPatchSource {
    pub fn new(root: PathBuf, patches_dir: String, suffix: String) -> Self {
        Self {
            root,
            patches_dir,
            suffix,
        }
    }
}

#[async_trait]
impl PatchSource for FsPatchSource {
    async fn discover(&self) -> AppResult<Vec<PatchLocation>> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(AppError::source_unavailable(
                    &self.root,
                    io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
                ));
            }
            Err(err) => return Err(AppError::source_unavailable(&self.root, err)),
        }

        let root = self.root.clone();
        let patches_dir = self.patches_dir.clone();
        let suffix = self.suffix.clone();
        tokio::task::spawn_blocking(move || scan_projects(&root, &patches_dir, &suffix)).await?
    }

    async fn read(&self, location: &PatchLocation) -> AppResult<Vec<u8>> {
        tokio::fs::read(&location.path)
            .await
            .map_err(|err| AppError::source_unavailable(&location.path, err))
    }
}

fn scan_projects(root: &Path, patches_dir: &str, suffix: &str) -> AppResult<Vec<PatchLocation>> {
    let mut locations = Vec::new();

    for project in sorted_children(root)? {
        // Follows symlinks; a dangling link is not a directory.
        if !project.path().is_dir() {
            continue;
        }
        let project_name = project.file_name().to_string_lossy().into_owned();
        let patches_path = project.path().join(patches_dir);
        if !patches_path.is_dir() {
            debug!(project = %project_name, "no patches directory, skipping");
            continue;
        }

        for entry in sorted_children(&patches_path)? {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            // Dangling links are kept so that reading them reports the missing source.
            if entry.path().is_dir() || !file_name.ends_with(suffix) {
                continue;
            }
            locations.push(PatchLocation::new(
                project_name.clone(),
                file_name,
                entry.into_path(),
            ));
        }
    }

    Ok(locations)
}

/// Lists the direct children of `dir` by name. Symlinks are not resolved here, so a
/// dangling link is still listed. Entries that cannot be listed are logged and skipped.
fn sorted_children(dir: &Path) -> AppResult<Vec<DirEntry>> {
    let mut children = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => children.push(entry),
            Err(err) if err.depth() == 0 => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                return Err(AppError::source_unavailable(path, io::Error::from(err)));
            }
            Err(err) => warn!(error = %err, "skipping unreadable directory entry"),
        }
    }
    Ok(children)
}
