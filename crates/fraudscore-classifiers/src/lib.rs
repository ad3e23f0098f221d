//! fraudscore-classifiers: pre-fit binary classifiers for transaction scoring.
//!
//! This crate loads a serialized model artifact (a `gbdt` tree ensemble, an
//! XGBoost dump, or exported logistic-regression weights), wraps it behind
//! the [`models::classifier_trait::ClassifierModel`] trait and exposes a
//! [`models::factory::Predictor`] that turns one feature vector into an
//! integer class label.
//!
//! Inputs are shaped with the small `Array1`/`Array2` containers in
//! [`math`] so backends never see raw request types.
pub mod config;
pub mod error;
pub mod math;
pub mod models;

pub use config::{ModelConfig, ModelFormat};
pub use error::{ModelError, PredictError};
pub use models::factory::{load_model, Predictor};
