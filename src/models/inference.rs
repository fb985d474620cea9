//! Inference engine: validate, transform, classify, decide.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{AppConfig, ModelBackend};
use crate::error::ServiceError;
use crate::features::FeatureExtractor;
use crate::models::endpoint::EndpointClassifier;
use crate::models::loader::OnnxClassifier;
use crate::models::Classifier;
use crate::types::application::LoanApplication;
use crate::types::prediction::Prediction;

/// The one entry point the serving layer calls per request.
///
/// Stateless apart from the classifier handle; every invocation is
/// independent and may run concurrently.
pub struct InferenceEngine {
    extractor: FeatureExtractor,
    classifier: Arc<dyn Classifier>,
    threshold: f64,
}

impl InferenceEngine {
    /// Create an engine around an existing classifier.
    pub fn new(classifier: Arc<dyn Classifier>, threshold: f64) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            classifier,
            threshold,
        }
    }

    /// Build the configured backend and wrap it in an engine.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let classifier: Arc<dyn Classifier> = match config.model.backend {
            ModelBackend::Local => Arc::new(OnnxClassifier::load(
                &config.model.model_path,
                config.model.intra_threads,
            )?),
            ModelBackend::Remote => {
                let url = config.model.endpoint_url.as_deref().ok_or_else(|| {
                    ServiceError::Internal(
                        "model.endpoint_url must be set for the remote backend".into(),
                    )
                })?;
                Arc::new(EndpointClassifier::new(url, config.model.timeout_ms)?)
            }
        };

        info!(
            backend = %classifier.name(),
            threshold = config.detection.threshold,
            "Inference engine initialized"
        );

        Ok(Self::new(classifier, config.detection.threshold))
    }

    /// Score one application end to end.
    pub async fn predict(&self, application: &LoanApplication) -> Result<Prediction, ServiceError> {
        let features = self.extractor.extract(application)?;
        let output = self.classifier.classify(&features).await?;
        let prediction = Prediction::from_output(&output, self.threshold);

        debug!(
            prediction = ?prediction.prediction,
            confidence = prediction.confidence,
            "Decision rule applied"
        );

        Ok(prediction)
    }

    /// Backend name, for logs and the health endpoint.
    pub fn backend_name(&self) -> &str {
        self.classifier.name()
    }
}
