use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::error::{ModelError, PredictError};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;

/// Gradient Boosting Decision Tree (GBDT) classifier backed by the `gbdt` crate.
pub struct GBDTClassifier {
    model: GBDT,
    name: &'static str,
    n_features: Option<usize>,
    /// `binary:logitraw` boosters return margins, not probabilities.
    raw_margin: bool,
}

impl GBDTClassifier {
    /// Wrap an in-memory booster. Its feature count is not checked.
    pub fn new(model: GBDT) -> Self {
        GBDTClassifier {
            model,
            name: "gbdt",
            n_features: None,
            raw_margin: false,
        }
    }

    /// Read a model written by `GBDT::save_model`. The feature count the
    /// booster was trained with (`conf.feature_size`) becomes the expected
    /// vector length.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let parse_error = |reason: String| ModelError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_slice(&contents).map_err(|e| parse_error(e.to_string()))?;
        let feature_size = value["conf"]["feature_size"]
            .as_u64()
            .filter(|n| *n > 0)
            .map(|n| n as usize);
        let model: GBDT =
            serde_json::from_value(value).map_err(|e| parse_error(e.to_string()))?;

        Ok(GBDTClassifier {
            n_features: feature_size,
            ..GBDTClassifier::new(model)
        })
    }

    /// Read an XGBoost dump. `objective` must already be validated. Dumps do
    /// not record the feature count.
    pub fn load_xgboost(path: &Path, objective: &str) -> Result<Self, ModelError> {
        let file = path.to_str().ok_or_else(|| ModelError::Parse {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        let model = GBDT::from_xgboost_dump(file, objective).map_err(|e| ModelError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(GBDTClassifier {
            name: "xgboost",
            raw_margin: objective == "binary:logitraw",
            ..GBDTClassifier::new(model)
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic in gbdt predict".to_string()
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl ClassifierModel for GBDTClassifier {
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f32>, PredictError> {
        let mut test_x = DataVec::new();
        for row in x.rows() {
            let test_row: Vec<f32> = row.iter().map(|v| *v as f32).collect();
            test_x.push(Data::new_test_data(test_row, None));
        }

        // A vector shorter than the trees expect panics inside gbdt. The
        // default panic hook still prints the message to stderr.
        let scores = panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(&test_x)))
            .map_err(|payload| PredictError::Backend(panic_message(payload)))?;

        if self.raw_margin {
            Ok(scores.into_iter().map(sigmoid).collect())
        } else {
            Ok(scores)
        }
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn name(&self) -> &str {
        self.name
    }
}
