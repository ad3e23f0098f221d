//! HTTP tests for `/predict` and `/health`, driven through `actix_web::test`.

use std::io::Write;
use std::path::{Path, PathBuf};

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use fraudscore_classifiers::math::Array2;
use fraudscore_classifiers::models::classifier_trait::ClassifierModel;
use fraudscore_classifiers::models::logistic::{LogisticClassifier, LogisticWeights};
use fraudscore_classifiers::{load_model, ModelConfig, ModelFormat, PredictError, Predictor};
use fraudscore_cli::config::CorsConfig;
use fraudscore_cli::server::types::{ErrorBody, HealthResponse, PredictResponse};
use fraudscore_cli::server::{build_cors, configure, json_config};

const N_FEATURES: usize = 30;

/// Logistic model that flags a transaction once the last feature (the
/// amount) is large; an all-zero vector scores sigmoid(-5).
fn amount_model() -> Predictor {
    let mut coefficients = vec![0.0; N_FEATURES];
    coefficients[N_FEATURES - 1] = 0.01;
    let model = LogisticClassifier::new(LogisticWeights {
        coefficients,
        intercept: -5.0,
    });
    Predictor::new(Box::new(model), 0.5, None)
}

/// Stands in for a tree backend that raises on input it cannot handle.
struct RejectingModel;

impl ClassifierModel for RejectingModel {
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Vec<f32>, PredictError> {
        Err(PredictError::Backend("index out of bounds".to_string()))
    }
}

/// Save a 4-feature booster: legitimate rows near zero, fraud near 8.
fn saved_gbdt_model(dir: &Path) -> Predictor {
    let mut config = Config::new();
    config.set_feature_size(4);
    config.set_shrinkage(0.3);
    config.set_max_depth(2);
    config.set_iterations(10);
    config.set_loss("LogLikelyhood");

    let mut train = DataVec::new();
    for i in 0..6 {
        let jitter = i as f32 * 0.05;
        train.push(Data::new_training_data(vec![jitter; 4], 1.0, -1.0, None));
        train.push(Data::new_training_data(vec![8.0 + jitter; 4], 1.0, 1.0, None));
    }
    let mut gbdt = GBDT::new(&config);
    gbdt.fit(&mut train);

    let path = dir.join("creditcard_model.json");
    gbdt.save_model(path.to_str().unwrap()).unwrap();
    load_model(&ModelConfig::new(path, ModelFormat::Gbdt)).unwrap()
}

/// XGBoost dump with one stump on feature 2. Dumps carry no feature count.
fn xgboost_stump(dir: &Path) -> Predictor {
    let path: PathBuf = dir.join("xgb.dump");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "0.0").unwrap();
    writeln!(
        file,
        r#"[{{"nodeid":0,"depth":0,"split":"f2","split_condition":1.0,"yes":1,"no":2,"missing":1,"children":[{{"nodeid":1,"leaf":-0.4}},{{"nodeid":2,"leaf":0.4}}]}}]"#
    )
    .unwrap();
    load_model(&ModelConfig::new(path, ModelFormat::XGBoost)).unwrap()
}

macro_rules! app {
    ($predictor:expr, $cors:expr) => {
        test::init_service(
            App::new()
                .wrap(build_cors(&$cors))
                .app_data(web::Data::new($predictor))
                .app_data(json_config(64 * 1024))
                .configure(configure),
        )
        .await
    };
    ($predictor:expr) => {
        app!($predictor, CorsConfig::default())
    };
}

fn features_with_amount(amount: f64) -> Vec<f64> {
    let mut features = vec![0.0; N_FEATURES];
    features[N_FEATURES - 1] = amount;
    features
}

// ---------------------------------------------------------------------------
// Successful predictions
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn zero_vector_predicts_zero() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": vec![0; N_FEATURES] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "prediction": 0 }));
}

#[actix_web::test]
async fn large_amount_predicts_fraud() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": features_with_amount(2500.0) }))
        .to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.prediction, 1);
}

#[actix_web::test]
async fn prediction_is_always_an_integer() {
    let app = app!(amount_model());

    for amount in [0.0, 12.5, 499.99, 500.0, 10_000.0] {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "features": features_with_amount(amount) }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["prediction"].is_i64(), "amount {} -> {}", amount, body);
    }
}

#[actix_web::test]
async fn repeated_requests_agree() {
    let app = app!(amount_model());
    let payload = serde_json::json!({ "features": features_with_amount(320.0), "id": "TXN1" });

    let mut seen = Vec::new();
    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(&payload)
            .to_request();
        let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
        seen.push(body.prediction);
    }
    assert!(seen.windows(2).all(|w| w[0] == w[1]), "{:?}", seen);
}

// ---------------------------------------------------------------------------
// Rejected requests
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn empty_features_is_rejected_and_server_keeps_serving() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "validation_error");

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": vec![0; N_FEATURES] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_features_key_is_rejected() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "values": [0, 0, 0] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "validation_error");
    assert!(body.message.contains("features"), "{}", body.message);
}

#[actix_web::test]
async fn non_numeric_features_are_rejected() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [0, "abc", null] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(header::ContentType::json())
        .set_payload("{\"features\": [0, 0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wrong_length_is_rejected() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [0.0, 1.0] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "validation_error");
    assert_eq!(body.message, "Expected 30 features, got 2");
}

#[actix_web::test]
async fn gbdt_model_rejects_longer_and_shorter_vectors() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(saved_gbdt_model(dir.path()));

    for (features, got) in [(vec![0.0; 7], 7), (vec![8.0], 1)] {
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(serde_json::json!({ "features": features }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "validation_error");
        assert_eq!(body.message, format!("Expected 4 features, got {}", got));
    }

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [8.0, 8.0, 8.0, 8.0] }))
        .to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.prediction, 1);
}

#[actix_web::test]
async fn tree_panic_is_inference_error_and_server_keeps_serving() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(xgboost_stump(dir.path()));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [1.0] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "inference_error");
    assert!(body.message.contains("feature"), "{}", body.message);

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [0.0, 0.0, 3.0] }))
        .to_request();
    let body: PredictResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.prediction, 1);
}

#[actix_web::test]
async fn backend_failure_is_inference_error() {
    let app = app!(Predictor::new(Box::new(RejectingModel), 0.5, None));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({ "features": [1.0, 2.0] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "inference_error");
}

#[actix_web::test]
async fn get_on_predict_is_not_allowed() {
    let app = app!(amount_model());

    let req = test::TestRequest::get().uri("/predict").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Health and CORS
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn health_reports_model() {
    let app = app!(amount_model());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.status, "ok");
    assert_eq!(body.model, "logistic");
    assert_eq!(body.n_features, Some(N_FEATURES));
}

#[actix_web::test]
async fn preflight_allows_any_origin_by_default() {
    let app = app!(amount_model());

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/predict")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[actix_web::test]
async fn configured_origin_is_echoed() {
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        max_age: 60,
    };
    let app = app!(amount_model(), cors);

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/predict")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/predict")
        .insert_header((header::ORIGIN, "http://evil.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let allowed = resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert!(allowed.map_or(true, |v| v != "http://evil.example"));
}

#[actix_web::test]
async fn simple_cross_origin_post_carries_cors_header() {
    let app = app!(amount_model());

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .set_json(serde_json::json!({ "features": vec![0; N_FEATURES] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
