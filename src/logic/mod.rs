//! Leaf analysis core

pub mod cache;
pub mod composer;
pub mod heuristic;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod types;

pub use cache::CacheEntry;
pub use pipeline::{AnalysisError, AnalysisPipeline, PipelineSources, PipelineStatus};
