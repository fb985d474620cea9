//! Hosted-endpoint classifier backend.
//!
//! The original deployment served the model behind a managed inference
//! endpoint and proxied requests to it. This backend keeps that path: the
//! transformed feature record goes out as JSON, and the endpoint answers
//! with `{ "loan_status": "Approved"|"Rejected", "confidence": <f64> }`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::ServiceError;
use crate::features::FeatureVector;
use crate::models::Classifier;
use crate::types::prediction::{ClassifierOutput, LoanStatus};

/// Remote classifier that forwards feature records to a hosted endpoint.
pub struct EndpointClassifier {
    client: reqwest::Client,
    url: String,
}

/// Wire response of the hosted endpoint.
#[derive(Debug, Deserialize)]
struct EndpointResponse {
    loan_status: LoanStatus,
    confidence: f64,
}

impl EndpointClassifier {
    /// Create a client for the given endpoint URL.
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ServiceError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Endpoint URL this backend talks to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Classifier for EndpointClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ServiceError> {
        let record = features.to_record();

        let response = self
            .client
            .post(&self.url)
            .json(&record)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("endpoint call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let parsed: EndpointResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Upstream(format!("malformed endpoint response: {e}")))?;

        debug!(
            loan_status = ?parsed.loan_status,
            confidence = parsed.confidence,
            "Endpoint response received"
        );

        // Normalize to per-class probabilities; class 1 = approved
        let confidence = parsed.confidence.clamp(0.0, 1.0);
        let p_approved = match parsed.loan_status {
            LoanStatus::Approved => confidence,
            LoanStatus::Rejected => 1.0 - confidence,
        };

        Ok(ClassifierOutput::Probabilities(vec![
            1.0 - p_approved,
            p_approved,
        ]))
    }

    fn name(&self) -> &str {
        "endpoint"
    }
}
