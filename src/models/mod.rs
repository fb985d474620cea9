//! Classifier backends and the inference engine.

pub mod endpoint;
pub mod inference;
pub mod loader;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::features::FeatureVector;
use crate::types::prediction::ClassifierOutput;

/// Backend-agnostic classifier handle: opaque artifact in, scores out.
///
/// Implemented by the in-process ONNX session and the hosted-endpoint
/// proxy. The decision rule is applied by the caller, never here, so
/// both backends stay consistent end-to-end.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Score a feature vector.
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ServiceError>;

    /// Short backend name for logs and health reporting.
    fn name(&self) -> &str;
}
