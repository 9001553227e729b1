//! Model Module - learned leaf classifier
//!
//! Optional second tier on top of the heuristic analyzer.

pub mod inference;
pub mod preprocess;
pub mod signature;

// Re-export common types
pub use inference::{EngineStatus, InferenceError, ModelEngine, ModelPrediction};
