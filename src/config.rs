use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const CONFIG_FILE_NAME: &str = ".patchstats.json";

const DEFAULT_PATCHES_ROOT: &str = "./Patches";
const DEFAULT_PATCHES_DIR: &str = "patches";
const DEFAULT_PATCH_SUFFIX: &str = ".src.patch";
const DEFAULT_PATCH_REPORT: &str = "patch_analysis_report.csv";
const DEFAULT_TAKES_INPUT: &str = "./D4J.json";
const DEFAULT_TAKES_REPORT: &str = "test_analysis_results.csv";
const DEFAULT_READ_CONCURRENCY: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub workspace_root: PathBuf,
    pub patches_root: PathBuf,
    pub patches_dir: String,
    pub patch_suffix: String,
    pub patch_report: PathBuf,
    pub takes_input: PathBuf,
    pub takes_report: PathBuf,
    /// Upper bound on patch files read at the same time.
    pub read_concurrency: usize,
}

/// Values persisted in [`CONFIG_FILE_NAME`]. Unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patches_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patches_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub takes_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub takes_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_concurrency: Option<usize>,
}

pub fn config_file_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(CONFIG_FILE_NAME)
}

impl StoredConfig {
    pub fn load(workspace_root: &Path) -> AppResult<Self> {
        let path = config_file_path(workspace_root);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self, workspace_root: &Path) -> AppResult<()> {
        let path = config_file_path(workspace_root);
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to encode config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = StoredConfig::load(workspace_hint)?;
        Self::resolve(workspace_hint, &stored, |key| env::var(key).ok())
    }

    /// Layers defaults, the stored file, then environment lookups.
    pub fn resolve(
        workspace_root: &Path,
        stored: &StoredConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let pick = |env_key: &str, stored: &Option<String>, default: &str| -> String {
            env_lookup(env_key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| stored.clone())
                .unwrap_or_else(|| default.to_string())
        };

        let patches_dir = pick("PATCHSTATS_PATCHES_DIR", &stored.patches_dir, DEFAULT_PATCHES_DIR);
        let patch_suffix = pick("PATCHSTATS_PATCH_SUFFIX", &stored.patch_suffix, DEFAULT_PATCH_SUFFIX);

        let read_concurrency = match env_lookup("PATCHSTATS_READ_CONCURRENCY")
            .filter(|value| !value.trim().is_empty())
        {
            Some(value) => value.trim().parse().map_err(|err| {
                AppError::Configuration(format!(
                    "PATCHSTATS_READ_CONCURRENCY must be a positive integer: {err}"
                ))
            })?,
            None => stored.read_concurrency.unwrap_or(DEFAULT_READ_CONCURRENCY),
        };

        let config = Self {
            workspace_root: workspace_root.to_path_buf(),
            patches_root: workspace_root.join(pick(
                "PATCHSTATS_PATCHES_ROOT",
                &stored.patches_root,
                DEFAULT_PATCHES_ROOT,
            )),
            patches_dir,
            patch_suffix,
            patch_report: workspace_root.join(pick(
                "PATCHSTATS_PATCH_REPORT",
                &stored.patch_report,
                DEFAULT_PATCH_REPORT,
            )),
            takes_input: workspace_root.join(pick(
                "PATCHSTATS_TAKES_INPUT",
                &stored.takes_input,
                DEFAULT_TAKES_INPUT,
            )),
            takes_report: workspace_root.join(pick(
                "PATCHSTATS_TAKES_REPORT",
                &stored.takes_report,
                DEFAULT_TAKES_REPORT,
            )),
            read_concurrency,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.patch_suffix.is_empty() {
            return Err(AppError::Configuration(
                "patch suffix must not be empty".to_string(),
            ));
        }
        if self.patches_dir.trim().is_empty() {
            return Err(AppError::Configuration(
                "patches directory name must not be empty".to_string(),
            ));
        }
        if self.read_concurrency == 0 {
            return Err(AppError::Configuration(
                "read concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves a command-line path against the workspace root.
    pub fn workspace_path(&self, path: &Path) -> PathBuf {
        self.workspace_root.join(path)
    }
}
