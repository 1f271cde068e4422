use std::path::Path;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::data::table::FeatureMatrix;
use crate::error::ModelError;

/// Multinomial logistic regression exported as JSON.
///
/// ```json
/// {
///   "classes": ["setosa", "versicolor", "virginica"],
///   "feature_names": ["sepal_length", "sepal_width", "petal_length", "petal_width"],
///   "coefficients": [[...4], [...4], [...4]],
///   "intercepts": [b0, b1, b2]
/// }
/// ```
///
/// `feature_names` is optional; without it the model is positional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl SoftmaxRegression {
    /// Read and validate an artifact from disk.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let model: SoftmaxRegression = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: String| Err(ModelError::Invalid(msg));

        if self.classes.len() != 3 {
            return invalid(format!("expected 3 classes, found {}", self.classes.len()));
        }
        if self.coefficients.len() != self.classes.len() {
            return invalid(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            ));
        }
        if self.intercepts.len() != self.classes.len() {
            return invalid(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                self.classes.len()
            ));
        }
        let width = self.coefficients[0].len();
        if width == 0 || self.coefficients.iter().any(|row| row.len() != width) {
            return invalid("coefficient rows must share a non-zero width".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != width {
                return invalid(format!(
                    "{} feature names for {width} coefficients",
                    names.len()
                ));
            }
        }
        Ok(())
    }

    /// Number of input features the model consumes.
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn probabilities(&self, x: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(x).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect();
        softmax(&logits)
    }
}

impl Classifier for SoftmaxRegression {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, input: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        let expected = self.n_features();
        if input.width() != expected {
            bail!(
                "X has {} features, but SoftmaxRegression is expecting {expected} features as input",
                input.width()
            );
        }
        let rows = input.to_f64_rows()?;
        rows.iter()
            .enumerate()
            .map(|(row_no, x)| {
                ensure!(
                    x.iter().all(|v| v.is_finite()),
                    "input contains NaN or infinity in row {row_no}"
                );
                Ok(self.probabilities(x))
            })
            .collect()
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max_val = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_vals: Vec<f64> = logits.iter().map(|&x| (x - max_val).exp()).collect();
    let total: f64 = exp_vals.iter().sum();
    exp_vals.iter().map(|&e| e / total).collect()
}
