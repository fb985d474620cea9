//! Configuration management for the loan prediction service.
//!
//! Region, bucket and endpoint names that the original deployment scripts
//! hard-coded live here instead, loaded once and passed explicitly at
//! construction time.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Which classifier backend serves predictions.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Load the ONNX artifact and run inference in-process.
    #[default]
    Local,
    /// Proxy transformed feature records to a hosted endpoint.
    Remote,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Classifier backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Backend: "local" (ONNX in-process) or "remote" (hosted endpoint)
    #[serde(default)]
    pub backend: ModelBackend,
    /// Path to the ONNX model artifact (local backend)
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Hosted endpoint URL (remote backend)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Request timeout for the remote backend, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

/// Decision rule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Approval threshold applied to scalar classifier scores
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model_path() -> String {
    "models/loan_model.onnx".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_intra_threads() -> usize {
    1
}

fn default_threshold() -> f64 {
    crate::types::prediction::DECISION_THRESHOLD
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Local,
            model_path: default_model_path(),
            endpoint_url: None,
            timeout_ms: default_timeout_ms(),
            intra_threads: default_intra_threads(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
