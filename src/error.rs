use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Upload failures
// ---------------------------------------------------------------------------

/// The upload could not be turned into a table. Prediction is never
/// attempted after one of these.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no columns to parse from file")]
    Empty,

    #[error("invalid UTF-8 on line {line}")]
    Encoding { line: u64 },

    #[error("expected {expected} fields on line {line}, found {found}")]
    RowWidth { line: u64, expected: u64, found: u64 },

    #[error("could not read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Malformed(String),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => ParseError::Io(e),
            csv::ErrorKind::Utf8 { pos, .. } => ParseError::Encoding {
                line: pos.map(|p| p.line()).unwrap_or(0),
            },
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ParseError::RowWidth {
                line: pos.map(|p| p.line()).unwrap_or(0),
                expected: expected_len,
                found: len,
            },
            _ => ParseError::Malformed(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline failures
// ---------------------------------------------------------------------------

/// Fatal outcome of a pipeline invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("model artifact {} is unavailable: {reason}", .path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

// ---------------------------------------------------------------------------
// Model artifact failures
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("reading model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Non-fatal notices
// ---------------------------------------------------------------------------

/// Schema reconciliation findings. These never stop the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Schema features absent from the upload.
    MissingColumns(Vec<String>),
    /// Upload columns the schema does not name; they are dropped.
    ExtraColumns(Vec<String>),
}

impl Notice {
    pub fn is_warning(&self) -> bool {
        matches!(self, Notice::MissingColumns(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingColumns(cols) => write!(
                f,
                "Uploaded data is missing expected columns: {cols:?}. Prediction may fail."
            ),
            Notice::ExtraColumns(cols) => write!(f, "Ignoring extra columns: {cols:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_name_their_columns() {
        let warn = Notice::MissingColumns(vec!["petal_width".into()]);
        assert!(warn.is_warning());
        assert!(warn.to_string().contains("\"petal_width\""));

        let info = Notice::ExtraColumns(vec!["id".into()]);
        assert!(!info.is_warning());
        assert_eq!(info.to_string(), "Ignoring extra columns: [\"id\"]");
    }

    #[test]
    fn model_unavailable_names_path() {
        let err = PipelineError::ModelUnavailable {
            path: PathBuf::from("model.json"),
            reason: "model.json not found".into(),
        };
        assert!(err.to_string().starts_with("model artifact model.json is unavailable"));
    }
}
