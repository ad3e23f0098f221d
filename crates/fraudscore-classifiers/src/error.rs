use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures while reading a model artifact. All of them are fatal at startup.
#[derive(Debug)]
pub enum ModelError {
    NotFound(PathBuf),
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, reason: String },
    UnsupportedObjective(String),
    InvalidThreshold(f32),
    FeatureCountConflict { configured: usize, artifact: usize },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::NotFound(path) => {
                write!(f, "Model file not found: {}", path.display())
            }
            ModelError::Io { path, source } => {
                write!(f, "Failed to read model file {}: {}", path.display(), source)
            }
            ModelError::Parse { path, reason } => {
                write!(f, "Invalid model file {}: {}", path.display(), reason)
            }
            ModelError::UnsupportedObjective(objective) => {
                write!(f, "Unsupported XGBoost objective: {}", objective)
            }
            ModelError::InvalidThreshold(threshold) => {
                write!(f, "Decision threshold must lie in [0, 1], got {}", threshold)
            }
            ModelError::FeatureCountConflict {
                configured,
                artifact,
            } => write!(
                f,
                "Configured n_features ({}) does not match the model artifact ({})",
                configured, artifact
            ),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failures while scoring a single feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    EmptyFeatures,
    DimensionMismatch { expected: usize, got: usize },
    NonFinite { index: usize },
    Backend(String),
    EmptyOutput,
}

impl PredictError {
    /// True when the caller sent something that can never be scored, as
    /// opposed to the model rejecting an otherwise well-formed vector.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictError::EmptyFeatures
                | PredictError::DimensionMismatch { .. }
                | PredictError::NonFinite { .. }
        )
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PredictError::EmptyFeatures => write!(f, "Feature vector is empty"),
            PredictError::DimensionMismatch { expected, got } => write!(
                f,
                "Expected {} features, got {}",
                expected, got
            ),
            PredictError::NonFinite { index } => {
                write!(f, "Feature at index {} is not a finite number", index)
            }
            PredictError::Backend(reason) => write!(f, "Model rejected the input: {}", reason),
            PredictError::EmptyOutput => write!(f, "Model returned no prediction"),
        }
    }
}

impl Error for PredictError {}
