//! ONNX model loading and in-process inference.
//!
//! sklearn exports of the loan classifier come in two output shapes: a raw
//! probability tensor, or the ZipMap `seq(map(int64, float))` form. Both
//! are handled here and normalized to [`ClassifierOutput`].

use async_trait::async_trait;
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::features::FeatureVector;
use crate::models::Classifier;
use crate::types::prediction::ClassifierOutput;

/// In-process classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    /// Session is behind a Mutex: ort requires `&mut` to run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load the classifier from an ONNX artifact on disk.
    ///
    /// A missing or unreadable artifact is a `ModelUnavailable` error.
    pub fn load<P: AsRef<Path>>(path: P, intra_threads: usize) -> Result<Self, ServiceError> {
        let path = path.as_ref();

        ort::init()
            .commit()
            .map_err(|e| ServiceError::Internal(format!("ONNX Runtime init failed: {e}")))?;

        if !path.exists() {
            return Err(ServiceError::ModelUnavailable(format!(
                "model artifact not found: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), threads = intra_threads, "Loading ONNX model");

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(intra_threads))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                ServiceError::ModelUnavailable(format!(
                    "failed to load model from {}: {e}",
                    path.display()
                ))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    fn run(&self, features: &FeatureVector) -> Result<ClassifierOutput, ServiceError> {
        use ort::value::Tensor;

        let data = features.to_vec();
        let shape = vec![1_i64, data.len() as i64];
        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| ServiceError::Internal(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ServiceError::Internal("model session lock poisoned".into()))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| ServiceError::Internal(format!("inference failed: {e}")))?;

        // Preferred output first, then any non-label output
        if let Some(output) = outputs.get(&self.output_name) {
            if let Some(parsed) = parse_output(output)? {
                return Ok(parsed);
            }
        }
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(parsed) = parse_output(&output)? {
                debug!(output = %name, "Extracted score from fallback output");
                return Ok(parsed);
            }
        }

        Err(ServiceError::Internal(
            "classifier produced no usable probability output".into(),
        ))
    }
}

#[async_trait]
impl Classifier for OnnxClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ServiceError> {
        self.run(features)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Try to read one model output as probabilities or a scalar score.
fn parse_output(output: &ort::value::DynValue) -> Result<Option<ClassifierOutput>, ServiceError> {
    // Tensor format: [batch, num_classes] or [batch, 1]
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        return Ok(parse_tensor(shape, data));
    }

    // ZipMap format: seq(map(int64, float)), one map per batch row
    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return parse_sequence_map(output).map(Some);
    }

    Ok(None)
}

fn parse_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Option<ClassifierOutput> {
    let dims: Vec<i64> = shape.iter().copied().collect();
    let num_classes = match dims.as_slice() {
        [_, n] => *n as usize,
        [n] => *n as usize,
        _ => return None,
    };

    match num_classes {
        0 => None,
        1 => Some(ClassifierOutput::Score(f64::from(data[0]))),
        n => Some(ClassifierOutput::Probabilities(
            data.iter().take(n).map(|&p| f64::from(p)).collect(),
        )),
    }
}

fn parse_sequence_map(output: &ort::value::DynValue) -> Result<ClassifierOutput, ServiceError> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| ServiceError::Internal(format!("failed to downcast to sequence: {e}")))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| ServiceError::Internal(format!("failed to extract sequence: {e}")))?;

    let map_value = maps
        .first()
        .ok_or_else(|| ServiceError::Internal("empty probability sequence".into()))?;

    let kv_pairs = map_value
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| ServiceError::Internal(format!("failed to extract class map: {e}")))?;

    // Class 0 = rejected, class 1 = approved
    let mut rejected = None;
    let mut approved = None;
    for (class_id, prob) in &kv_pairs {
        match class_id {
            0 => rejected = Some(f64::from(*prob)),
            1 => approved = Some(f64::from(*prob)),
            _ => {}
        }
    }

    match (rejected, approved) {
        (Some(p0), Some(p1)) => Ok(ClassifierOutput::Probabilities(vec![p0, p1])),
        (None, Some(p1)) => Ok(ClassifierOutput::Score(p1)),
        (Some(p0), None) => Ok(ClassifierOutput::Score(1.0 - p0)),
        (None, None) => Err(ServiceError::Internal(
            "no class probability found in model output".into(),
        )),
    }
}
