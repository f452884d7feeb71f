//! Pretrained logistic posture model.
//!
//! Parameters come from an offline-trained logistic regression: one weight,
//! mean and standard deviation per aggregated feature, plus a bias. Each
//! feature is standardized with the trained mean/std before the weighted sum,
//! and the sum is squashed to a probability that the posture is good
//! (label 1 = good in the training data).

use crate::core::aggregate::{FEATURE_SCHEMA, NUM_WINDOW_FEATURES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of one window evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Probability in [0, 1] that the posture is good
    pub p_good: f64,
    /// p_good < 0.5; a tie at exactly 0.5 counts as good
    pub is_bad: bool,
}

/// Immutable pretrained model parameters. Validated once at load; read-only
/// for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureModel {
    /// Feature layout id this model was trained against
    pub feature_schema: String,
    pub weights: Vec<f64>,
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    pub bias: f64,
}

impl PostureModel {
    /// Load and validate model parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ModelError::Io(e.to_string()))?;
        let model: PostureModel =
            serde_json::from_str(&content).map_err(|e| ModelError::Parse(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Check the startup contract: matching schema, all three vectors of
    /// length 36, finite parameters, strictly positive stds.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.feature_schema != FEATURE_SCHEMA {
            return Err(ModelError::SchemaMismatch {
                expected: FEATURE_SCHEMA,
                found: self.feature_schema.clone(),
            });
        }
        for (name, v) in [
            ("weights", &self.weights),
            ("means", &self.means),
            ("stds", &self.stds),
        ] {
            if v.len() != NUM_WINDOW_FEATURES {
                return Err(ModelError::WrongLength {
                    field: name,
                    expected: NUM_WINDOW_FEATURES,
                    found: v.len(),
                });
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(ModelError::NonFinite { field: name });
            }
        }
        if !self.bias.is_finite() {
            return Err(ModelError::NonFinite { field: "bias" });
        }
        if self.stds.iter().any(|&s| s <= 0.0) {
            return Err(ModelError::NonPositiveStd);
        }
        Ok(())
    }

    /// Classify one aggregated feature vector.
    pub fn predict(&self, features: &[f64; NUM_WINDOW_FEATURES]) -> Classification {
        let mut z = self.bias;
        for i in 0..NUM_WINDOW_FEATURES {
            let standardized = (features[i] - self.means[i]) / self.stds[i];
            z += self.weights[i] * standardized;
        }
        let p_good = sigmoid(z);
        Classification {
            p_good,
            is_bad: p_good < 0.5,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Startup-time model contract violations. None of these are recoverable at
/// runtime; a model that fails validation is never installed in the pipeline.
#[derive(Debug)]
pub enum ModelError {
    Io(String),
    Parse(String),
    SchemaMismatch {
        expected: &'static str,
        found: String,
    },
    WrongLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    NonFinite {
        field: &'static str,
    },
    NonPositiveStd,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Io(e) => write!(f, "IO error: {e}"),
            ModelError::Parse(e) => write!(f, "Parse error: {e}"),
            ModelError::SchemaMismatch { expected, found } => write!(
                f,
                "Model feature schema mismatch: expected {expected}, found {found}"
            ),
            ModelError::WrongLength {
                field,
                expected,
                found,
            } => write!(f, "Model {field} has length {found}, expected {expected}"),
            ModelError::NonFinite { field } => write!(f, "Model {field} contains non-finite values"),
            ModelError::NonPositiveStd => {
                write!(f, "Model stds must all be strictly positive")
            }
        }
    }
}

impl std::error::Error for ModelError {}
