//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "model.json";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Snapshot of configuration values consumed by the app.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Classifier artifact (`IRIS_MODEL_PATH`).
    pub model_path: PathBuf,
    /// Rows shown in the upload and prediction previews (`IRIS_PREVIEW_ROWS`).
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AppConfig {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(path) = lookup("IRIS_MODEL_PATH").filter(|p| !p.is_empty()) {
            cfg.model_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("IRIS_PREVIEW_ROWS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => cfg.preview_rows = n,
                _ => log::warn!(
                    "Ignoring IRIS_PREVIEW_ROWS={raw:?}; using {DEFAULT_PREVIEW_ROWS}"
                ),
            }
        }
        cfg
    }
}
