use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Objectives accepted when reading an XGBoost dump.
pub const XGBOOST_OBJECTIVES: &[&str] = &["binary:logistic", "binary:logitraw", "reg:logistic"];

/// Where the model artifact lives and how to read it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub format: ModelFormat,

    /// Only consulted for `ModelFormat::XGBoost`.
    pub objective: String,

    /// Expected feature-vector length. `gbdt` and logistic artifacts record
    /// their own and must agree with it; XGBoost dumps do not, so without it
    /// their dimensionality is left to the backend.
    pub n_features: Option<usize>,

    pub threshold: f32,
}

/// Serialization formats the loader understands. Names are matched
/// case-insensitively, in config files and on the command line alike.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// `gbdt` crate `save_model` output.
    #[default]
    Gbdt,
    /// XGBoost dump converted to the `gbdt` crate's dump layout.
    XGBoost,
    /// `{"coefficients": [...], "intercept": ...}` logistic regression weights.
    Logistic,
}

impl FromStr for ModelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelFormat::Gbdt),
            "xgboost" => Ok(ModelFormat::XGBoost),
            "logistic" => Ok(ModelFormat::Logistic),
            _ => Err(format!(
                "Unknown model format: {}. Expected one of gbdt, xgboost, logistic",
                s
            )),
        }
    }
}

impl<'de> Deserialize<'de> for ModelFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl ModelConfig {
    pub fn new<P: Into<PathBuf>>(path: P, format: ModelFormat) -> Self {
        Self {
            path: path.into(),
            format,
            ..Self::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/creditcard_model.json"),
            format: ModelFormat::Gbdt,
            objective: "binary:logistic".to_string(),
            n_features: None,
            threshold: 0.5,
        }
    }
}
