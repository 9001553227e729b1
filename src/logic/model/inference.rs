//! Inference Engine - ONNX Runtime Integration
//!
//! One model, loaded once at startup. The session is not proven safe for
//! parallel runs, so [`ModelEngine`] owns it behind a mutex and every caller
//! goes through [`ModelEngine::classify`].

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use image::RgbImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DynValue, Tensor};
use parking_lot::Mutex;
use serde::Serialize;

use super::preprocess::{prepare_input, InputTensor};
use super::signature::ModelSignature;
use crate::logic::labels::{friendly_label, ClassLabels};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model not loaded")]
    NotLoaded,

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("unsupported model: {0}")]
    Unsupported(String),

    #[error("preprocessing failed: {0}")]
    Preprocess(String),

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model produced no scores")]
    EmptyOutput,
}

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// A loaded classifier that maps one batched image tensor to a score vector.
///
/// Implementations need not be safe for concurrent calls; [`ModelEngine`]
/// serializes access.
pub trait InferenceBackend: Send {
    fn signature(&self) -> &ModelSignature;
    fn run(&mut self, input: InputTensor) -> Result<Vec<f32>, InferenceError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxBackend {
    session: Session,
    signature: ModelSignature,
}

impl OnnxBackend {
    /// Load an ONNX model from file.
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        if !model_path.exists() {
            return Err(InferenceError::Load(format!(
                "model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(format!("failed to load model: {}", e)))?;

        let signature = ModelSignature::from_session(&session)?;
        Ok(Self { session, signature })
    }
}

fn tensor_value<T>(array: ndarray::Array4<T>) -> Result<DynValue, InferenceError>
where
    T: ort::tensor::PrimitiveTensorElementType + std::fmt::Debug + Clone + 'static,
{
    Tensor::from_array(array)
        .map(|t| t.into_dyn())
        .map_err(|e| InferenceError::Preprocess(format!("tensor error: {}", e)))
}

impl InferenceBackend for OnnxBackend {
    fn signature(&self) -> &ModelSignature {
        &self.signature
    }

    fn run(&mut self, input: InputTensor) -> Result<Vec<f32>, InferenceError> {
        let value = match input {
            InputTensor::F32(a) => tensor_value(a)?,
            InputTensor::U8(a) => tensor_value(a)?,
            InputTensor::I8(a) => tensor_value(a)?,
        };

        let outputs = self
            .session
            .run(ort::inputs![self.signature.input_name.as_str() => value])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs
            .get(self.signature.output_name.as_str())
            .ok_or_else(|| InferenceError::Runtime("no output".into()))?;

        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return Ok(data.to_vec());
        }
        let (_, data) = output
            .try_extract_tensor::<u8>()
            .map_err(|e| InferenceError::Runtime(format!("extract error: {}", e)))?;
        Ok(data.iter().map(|&v| v as f32).collect())
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Top class of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPrediction {
    pub class_index: usize,
    pub confidence: f32,
    /// Empty when the index has no label.
    pub raw_label: String,
    pub friendly_label: String,
}

struct LoadedModel {
    backend: Mutex<Box<dyn InferenceBackend>>,
    signature: ModelSignature,
    source: String,
    loaded_at: DateTime<Utc>,
}

/// Engine status for `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_source: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub signature: Option<ModelSignature>,
    pub inference_device: String,
    pub inference_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f32,
}

/// `Unloaded` or `Loaded`, decided once at construction.
pub struct ModelEngine {
    model: Option<LoadedModel>,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ModelEngine {
    pub fn unloaded() -> Self {
        Self {
            model: None,
            inference_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    /// Wrap an already loaded backend.
    pub fn with_backend(backend: Box<dyn InferenceBackend>, source: impl Into<String>) -> Self {
        let signature = backend.signature().clone();
        Self {
            model: Some(LoadedModel {
                backend: Mutex::new(backend),
                signature,
                source: source.into(),
                loaded_at: Utc::now(),
            }),
            ..Self::unloaded()
        }
    }

    /// Try to load the ONNX model once. Any failure leaves the engine unloaded.
    pub fn load(model_path: &Path) -> Self {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        match OnnxBackend::load(model_path) {
            Ok(backend) => {
                let sig = backend.signature();
                tracing::info!(
                    "ONNX model loaded: {}x{} {:?} {:?}, {} outputs",
                    sig.width,
                    sig.height,
                    sig.layout,
                    sig.element,
                    sig.output_len.map_or("dynamic".to_string(), |n| n.to_string())
                );
                Self::with_backend(Box::new(backend), model_path.display().to_string())
            }
            Err(e) => {
                tracing::warn!("{}; using heuristic analysis only", e);
                Self::unloaded()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn signature(&self) -> Option<&ModelSignature> {
        self.model.as_ref().map(|m| &m.signature)
    }

    /// Run one forward pass and map the top class to a label.
    ///
    /// Errors are per call; the engine stays loaded.
    pub fn classify(
        &self,
        img: &RgbImage,
        labels: &ClassLabels,
    ) -> Result<ModelPrediction, InferenceError> {
        let model = self.model.as_ref().ok_or(InferenceError::NotLoaded)?;
        let start = Instant::now();

        let result = prepare_input(img, &model.signature).and_then(|input| {
            let mut backend = model.backend.lock();
            backend.run(input)
        });

        self.inference_count.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);

        let scores = result.inspect_err(|_| {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        })?;

        let (class_index, confidence) = argmax(&scores).ok_or_else(|| {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
            InferenceError::EmptyOutput
        })?;

        if labels.len() != scores.len() && !labels.is_empty() {
            tracing::debug!(
                "label count {} does not match model output {}",
                labels.len(),
                scores.len()
            );
        }

        let raw_label = labels.get(class_index).unwrap_or_default().to_string();
        let friendly = friendly_label(&raw_label, class_index);

        Ok(ModelPrediction {
            class_index,
            confidence,
            raw_label,
            friendly_label: friendly,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: self.is_loaded(),
            model_source: self.model.as_ref().map(|m| m.source.clone()),
            loaded_at: self.model.as_ref().map(|m| m.loaded_at),
            signature: self.signature().cloned(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            inference_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

/// Index and value of the first maximum. NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}
