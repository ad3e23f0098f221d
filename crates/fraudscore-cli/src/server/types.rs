use serde::{Deserialize, Serialize};

/// Body of `POST /predict`. Extra keys are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PredictResponse {
    pub prediction: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub n_features: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
