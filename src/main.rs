//! Loan Prediction Service - Main Entry Point
//!
//! Loads the configured classifier backend and serves predictions over HTTP.

use anyhow::Result;
use loan_prediction_service::{
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    models::inference::InferenceEngine,
    server::{router, AppState},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loan_prediction_service=info".parse()?),
        )
        .init();

    info!("Starting Loan Prediction Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        backend = ?config.model.backend,
        threshold = config.detection.threshold,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());

    // Initialize inference engine with the configured backend
    let engine = Arc::new(InferenceEngine::from_config(&config)?);
    info!(backend = %engine.backend_name(), "Inference engine ready");

    // Start metrics reporter (logs a summary every 60 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 60);
        reporter.start().await;
    });

    let state = AppState { engine, metrics };
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening for loan applications");

    axum::serve(listener, app).await?;

    Ok(())
}
