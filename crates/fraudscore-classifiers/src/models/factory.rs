use std::fs;
use std::io;

use crate::config::{ModelConfig, ModelFormat, XGBOOST_OBJECTIVES};
use crate::error::{ModelError, PredictError};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::gbdt::GBDTClassifier;
use crate::models::logistic::LogisticClassifier;

/// A loaded model plus the decision rule that turns its score into a label.
pub struct Predictor {
    model: Box<dyn ClassifierModel>,
    threshold: f32,
    n_features: Option<usize>,
}

impl Predictor {
    pub fn new(model: Box<dyn ClassifierModel>, threshold: f32, n_features: Option<usize>) -> Self {
        Self {
            model,
            threshold,
            n_features,
        }
    }

    /// Expected feature count: the artifact's own when it records one,
    /// otherwise whatever was configured.
    pub fn n_features(&self) -> Option<usize> {
        self.model.n_features().or(self.n_features)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    /// Score one sample and return its class label (`1` when the score
    /// reaches the threshold, `0` otherwise).
    pub fn predict_one(&self, features: &[f64]) -> Result<i64, PredictError> {
        if features.is_empty() {
            return Err(PredictError::EmptyFeatures);
        }
        if let Some(index) = features.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFinite { index });
        }
        if let Some(expected) = self.n_features() {
            if features.len() != expected {
                return Err(PredictError::DimensionMismatch {
                    expected,
                    got: features.len(),
                });
            }
        }

        let x = Array2::from_row(features.to_vec());
        let scores = self.model.predict_proba(&x)?;
        let score = *scores.first().ok_or(PredictError::EmptyOutput)?;
        if score.is_nan() {
            return Err(PredictError::Backend("model produced NaN".to_string()));
        }

        log::debug!(
            "{} scored {} features: {:.4} (threshold {})",
            self.model.name(),
            features.len(),
            score,
            self.threshold
        );

        Ok(if score >= self.threshold { 1 } else { 0 })
    }
}

/// Read the artifact described by `config` and wrap it in a [`Predictor`].
pub fn load_model(config: &ModelConfig) -> Result<Predictor, ModelError> {
    if !config.threshold.is_finite() || !(0.0..=1.0).contains(&config.threshold) {
        return Err(ModelError::InvalidThreshold(config.threshold));
    }

    let path = config.path.as_path();
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(ModelError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "not a regular file"),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ModelError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ModelError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let model: Box<dyn ClassifierModel> = match config.format {
        ModelFormat::Gbdt => Box::new(GBDTClassifier::load(path)?),
        ModelFormat::XGBoost => {
            if !XGBOOST_OBJECTIVES.contains(&config.objective.as_str()) {
                return Err(ModelError::UnsupportedObjective(config.objective.clone()));
            }
            Box::new(GBDTClassifier::load_xgboost(path, &config.objective)?)
        }
        ModelFormat::Logistic => Box::new(LogisticClassifier::load(path)?),
    };

    if let (Some(configured), Some(artifact)) = (config.n_features, model.n_features()) {
        if configured != artifact {
            return Err(ModelError::FeatureCountConflict {
                configured,
                artifact,
            });
        }
    }

    let predictor = Predictor::new(model, config.threshold, config.n_features);
    log::info!(
        "Loaded {} model from {} (features: {}, threshold: {})",
        predictor.name(),
        path.display(),
        predictor
            .n_features()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unchecked".to_string()),
        predictor.threshold()
    );
    Ok(predictor)
}
