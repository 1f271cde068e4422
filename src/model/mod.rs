//! Classifier capability boundary.
//!
//! A classifier is loaded once and then shared read-only. It is either
//! schema-aware (it names the features it expects, in order) or
//! schema-agnostic (it consumes columns positionally); the distinction is
//! the presence of [`Classifier::feature_names`].

pub mod softmax;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::data::table::FeatureMatrix;
use crate::error::PipelineError;

pub use softmax::SoftmaxRegression;

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

pub trait Classifier: Send + Sync {
    /// Ordered feature names the model expects, if it was fitted with any.
    fn feature_names(&self) -> Option<&[String]>;

    /// One probability row per input row. Implementations must not mutate
    /// themselves; the same handle serves every invocation.
    fn predict_proba(&self, input: &FeatureMatrix) -> Result<Vec<Vec<f64>>>;
}

// ---------------------------------------------------------------------------
// Loaded handle
// ---------------------------------------------------------------------------

/// Process-wide classifier slot: either a loaded, shareable classifier or the
/// reason it could not be loaded.
#[derive(Clone)]
pub enum ModelHandle {
    Loaded {
        path: PathBuf,
        classifier: Arc<dyn Classifier>,
    },
    Unavailable {
        path: PathBuf,
        reason: String,
    },
}

impl ModelHandle {
    /// Load the artifact at `path`. Failure is recorded, not raised.
    pub fn load(path: &Path) -> Self {
        match SoftmaxRegression::from_path(path) {
            Ok(model) => {
                log::info!(
                    "Loaded classifier from {} ({} features, schema: {})",
                    path.display(),
                    model.n_features(),
                    if model.feature_names().is_some() { "named" } else { "positional" }
                );
                ModelHandle::Loaded {
                    path: path.to_path_buf(),
                    classifier: Arc::new(model),
                }
            }
            Err(e) => {
                log::error!("Classifier unavailable at {}: {e}", path.display());
                ModelHandle::Unavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ModelHandle::Loaded { path, .. } | ModelHandle::Unavailable { path, .. } => path,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelHandle::Loaded { .. })
    }

    /// The classifier, or `ModelUnavailable` describing why there is none.
    pub fn classifier(&self) -> Result<&dyn Classifier, PipelineError> {
        match self {
            ModelHandle::Loaded { classifier, .. } => Ok(classifier.as_ref()),
            ModelHandle::Unavailable { path, reason } => Err(PipelineError::ModelUnavailable {
                path: path.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Loaded { path, classifier } => f
                .debug_struct("Loaded")
                .field("path", path)
                .field("feature_names", &classifier.feature_names())
                .finish(),
            ModelHandle::Unavailable { path, reason } => f
                .debug_struct("Unavailable")
                .field("path", path)
                .field("reason", reason)
                .finish(),
        }
    }
}
