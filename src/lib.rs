//! Loan Prediction Service Library
//!
//! A self-contained loan-approval inference service: feature transform,
//! decision rule, ONNX and hosted-endpoint classifier backends, and an
//! HTTP front door.

pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::ServiceError;
pub use features::{FeatureExtractor, FeatureVector};
pub use metrics::ServiceMetrics;
pub use models::inference::InferenceEngine;
pub use types::{application::LoanApplication, prediction::Prediction};
