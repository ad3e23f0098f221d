use actix_web::{web, HttpResponse};

use fraudscore_classifiers::Predictor;

use crate::server::error::ApiError;
use crate::server::types::{HealthResponse, PredictRequest, PredictResponse};

/// `POST /predict`: score one feature vector and return its class label.
pub async fn predict(
    predictor: web::Data<Predictor>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let features = req.into_inner().features;
    log::debug!("Prediction request with {} features", features.len());

    let model = predictor.clone();
    let prediction = web::block(move || model.predict_one(&features))
        .await
        .map_err(|e| {
            log::error!("Prediction worker failed: {}", e);
            ApiError::ModelUnavailable("prediction worker unavailable".to_string())
        })?
        .map_err(|e| {
            log::warn!("Prediction rejected: {}", e);
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(PredictResponse { prediction }))
}

/// `GET /health`
pub async fn health(predictor: web::Data<Predictor>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: predictor.name().to_string(),
        n_features: predictor.n_features(),
    })
}
