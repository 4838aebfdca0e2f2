//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the exported classifier and runs one forward pass per request.
//! The `Classifier` trait lets the predictor run against any backend.

use std::path::{Path, PathBuf};

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("tensor error: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Run(String),

    #[error("model returned {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },
}

/// Black-box image classifier: normalized tensor in, class scores out.
pub trait Classifier: Send + Sync {
    /// Human-readable model identifier
    fn name(&self) -> String;

    /// Run one forward pass and return the flat score vector
    fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(e.to_string()))?;

        tracing::info!(
            "ONNX model loaded ({} inputs, {} outputs)",
            session.inputs.len(),
            session.outputs.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> String {
        self.model_path.display().to_string()
    }

    fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let mut session = self.session.lock();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Run("model defines no outputs".to_string()))?;

        let input_tensor =
            Value::from_array(input).map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError::Run(format!("missing output `{}`", output_name)))?;

        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        Ok(scores.to_vec())
    }
}
