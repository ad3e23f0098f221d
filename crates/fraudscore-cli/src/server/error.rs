use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use fraudscore_classifiers::PredictError;

use crate::server::types::ErrorBody;

/// Client-facing error taxonomy for the HTTP API.
#[derive(Debug)]
pub enum ApiError {
    /// The request could never be scored: bad JSON, missing or non-numeric
    /// `features`, empty vector, wrong length.
    Validation(String),
    /// The model library rejected an otherwise well-formed vector.
    Inference(String),
    /// The model could not be run at all.
    ModelUnavailable(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Inference(_) => "inference_error",
            ApiError::ModelUnavailable(_) => "model_unavailable",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::Inference(msg) | ApiError::ModelUnavailable(msg) => {
                msg.as_str()
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        if err.is_input_error() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Inference(err.to_string())
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Inference(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind().to_string(),
            message: self.message().to_string(),
        })
    }
}
