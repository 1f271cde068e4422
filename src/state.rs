use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::data::export::Download;
use crate::data::loader::{load_file, parse_csv};
use crate::data::table::UploadedTable;
use crate::error::ParseError;
use crate::model::ModelHandle;
use crate::pipeline::{self, PipelineReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A successfully parsed upload.
pub struct Upload {
    /// File name as the user supplied it.
    pub name: String,
    pub table: UploadedTable,
}

/// The per-session UI state, independent of rendering.
pub struct AppState {
    /// Set once the user presses "Let's get started".
    pub started: bool,

    /// Rows shown in previews.
    pub preview_rows: usize,

    /// Shared classifier slot.
    pub model: ModelHandle,

    /// Last parsed upload (None until a file parses).
    pub upload: Option<Upload>,

    /// Notices and outcome of the last pipeline run.
    pub report: Option<PipelineReport>,

    /// Encoded predictions ready to be saved.
    pub download: Option<Download>,

    /// Upload or export failure shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &AppConfig, model: ModelHandle) -> Self {
        Self {
            started: false,
            preview_rows: config.preview_rows,
            model,
            upload: None,
            report: None,
            download: None,
            status_message: None,
        }
    }

    /// Reveal the upload controls.
    pub fn begin(&mut self) {
        self.started = true;
    }

    /// Parse an upload held in memory and, on success, run the pipeline.
    pub fn ingest_bytes(&mut self, name: &str, bytes: &[u8]) {
        self.accept(name, parse_csv(bytes));
    }

    /// Parse an upload from disk and, on success, run the pipeline.
    pub fn ingest_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        self.accept(&name, load_file(path));
    }

    fn accept(&mut self, name: &str, parsed: Result<UploadedTable, ParseError>) {
        self.upload = None;
        self.report = None;
        self.download = None;
        self.status_message = None;

        match parsed {
            Ok(table) => {
                log::info!(
                    "Loaded {name}: {} rows with columns {:?}",
                    table.len(),
                    table.columns
                );
                self.upload = Some(Upload {
                    name: name.to_string(),
                    table,
                });
                self.predict();
            }
            Err(e) => {
                log::error!("Failed to read {name}: {e}");
                self.status_message = Some(format!("Failed to read CSV: {e}"));
            }
        }
    }

    /// Refuse an upload whose name is not a `.csv` file.
    pub fn reject_upload(&mut self, name: &str) {
        log::warn!("Ignoring non-CSV upload {name:?}");
        self.status_message = Some(format!(
            "Failed to read CSV: {name:?} is not a .csv file"
        ));
    }

    /// Run the pipeline on the current upload and prepare the download.
    pub fn predict(&mut self) {
        self.status_message = None;
        let Some(upload) = &self.upload else {
            return;
        };
        let report = pipeline::run(&upload.table, &self.model);

        self.download = None;
        if let Ok(predictions) = &report.outcome {
            match Download::from_predictions(predictions) {
                Ok(d) => self.download = Some(d),
                Err(e) => {
                    log::error!("Failed to encode predictions: {e:#}");
                    self.status_message = Some(format!("Error: {e:#}"));
                }
            }
        }
        self.report = Some(report);
    }

    /// Re-read the classifier artifact and re-run the current upload.
    pub fn reload_model(&mut self) {
        let path = self.model.path().to_path_buf();
        self.model = ModelHandle::load(&path);
        self.predict();
    }

    /// Write the prepared download to `path`.
    pub fn save_download(&self, path: &Path) -> Result<()> {
        let download = self
            .download
            .as_ref()
            .context("no predictions to save")?;
        std::fs::write(path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Saved {} ({}, {} bytes) to {}",
            download.file_name,
            download.mime,
            download.bytes.len(),
            path.display()
        );
        Ok(())
    }
}
