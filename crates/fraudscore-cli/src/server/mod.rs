//! HTTP surface: routes, CORS policy, JSON extraction and the server loop.
pub mod error;
pub mod handlers;
pub mod types;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use fraudscore_classifiers::Predictor;

use crate::config::{CorsConfig, ServerConfig};
use crate::server::error::ApiError;

/// Register `/predict` and `/health`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/predict", web::post().to(handlers::predict))
        .route("/health", web::get().to(handlers::health));
}

/// Malformed bodies become `validation_error` responses instead of the
/// framework's plain-text default.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = if config.allows_any_origin() {
        Cors::default().allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method()
        .allow_any_header()
        .max_age(config.max_age)
}

/// Serve until the process is asked to stop. The predictor is shared
/// read-only by every worker.
pub async fn run(config: ServerConfig, predictor: Predictor) -> std::io::Result<()> {
    let predictor = web::Data::new(predictor);
    let cors_config = config.cors.clone();
    let json_limit = config.json_limit;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&cors_config))
            .app_data(predictor.clone())
            .app_data(json_config(json_limit))
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let bind_address = config.bind_address();
    log::info!("Listening on http://{}", bind_address);
    log::info!("   POST /predict  - score a feature vector");
    log::info!("   GET  /health   - model status");

    server.bind(&bind_address)?.run().await
}
