use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, PredictError};
use crate::math::{Array1, Array2};
use crate::models::classifier_trait::ClassifierModel;

/// On-disk layout of exported logistic-regression weights.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticWeights {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Linear model with a sigmoid link, `p = 1 / (1 + exp(-(w.x + b)))`.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticClassifier {
    pub fn new(weights: LogisticWeights) -> Self {
        Self {
            coefficients: Array1::from_vec(weights.coefficients),
            intercept: weights.intercept,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let weights: LogisticWeights =
            serde_json::from_str(&content).map_err(|e| ModelError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if weights.coefficients.is_empty() {
            return Err(ModelError::Parse {
                path: path.to_path_buf(),
                reason: "coefficients must not be empty".to_string(),
            });
        }
        if !weights.intercept.is_finite() || weights.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Parse {
                path: path.to_path_buf(),
                reason: "weights must be finite".to_string(),
            });
        }

        Ok(Self::new(weights))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ClassifierModel for LogisticClassifier {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f32>, PredictError> {
        if x.ncols() != self.coefficients.len() {
            return Err(PredictError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x
            .rows()
            .map(|row| sigmoid(self.coefficients.dot(row) + self.intercept) as f32)
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn name(&self) -> &str {
        "logistic"
    }
}
