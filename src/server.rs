//! HTTP front door: static form, prediction API, CORS, health.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceEngine;
use crate::types::application::LoanApplication;
use crate::types::prediction::Prediction;

/// Embedded application form served on GET /.
static INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub metrics: Arc<ServiceMetrics>,
}

/// Build the service router.
///
/// GET / serves the form, POST / scores an application, OPTIONS answers
/// CORS preflight. Anything else on a known path is 405.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index).post(predict).options(preflight))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn predict(
    State(state): State<AppState>,
    body: Result<Json<LoanApplication>, JsonRejection>,
) -> Result<Json<Prediction>, ServiceError> {
    let Json(application) = match body {
        Ok(json) => json,
        Err(e) => {
            let err = ServiceError::Validation(e.body_text());
            state.metrics.record_failure(&err);
            warn!(error = %err, "Rejected malformed request body");
            return Err(err);
        }
    };

    let request_id = Uuid::new_v4();
    let start = Instant::now();

    match state.engine.predict(&application).await {
        Ok(prediction) => {
            let latency = start.elapsed();
            state.metrics.record_prediction(latency, &prediction);
            info!(
                request_id = %request_id,
                prediction = ?prediction.prediction,
                confidence = prediction.confidence,
                latency_us = latency.as_micros(),
                "Application scored"
            );
            Ok(Json(prediction))
        }
        Err(e) => {
            state.metrics.record_failure(&e);
            warn!(request_id = %request_id, error = %e, "Prediction failed");
            Err(e)
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "backend": state.engine.backend_name(),
        "timestamp": Utc::now(),
    }))
}
