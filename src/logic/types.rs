//! Analysis result types shared by the heuristic, model and composer stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metric key carrying which stage produced the result.
pub const ANALYSIS_SOURCE_KEY: &str = "analysis_source";

/// Which stage produced an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Heuristic,
    Model,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Heuristic => "heuristic",
            AnalysisSource::Model => "model",
        }
    }
}

/// One metric value. Serialised without a tag so JSON consumers see plain numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Float(v) => Some(*v),
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Open metric map. The key set varies by analysis source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, MetricValue>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_float(&mut self, key: &str, value: f64, decimals: u32) {
        self.0.insert(key.to_string(), MetricValue::Float(round_to(value, decimals)));
    }

    pub fn insert_int(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_string(), MetricValue::Int(value));
    }

    pub fn insert_text(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), MetricValue::Text(value.into()));
    }

    pub fn set_source(&mut self, source: AnalysisSource) {
        self.insert_text(ANALYSIS_SOURCE_KEY, source.as_str());
    }

    /// Merge `other` into `self`; entries of `other` win on key collision.
    pub fn extend(&mut self, other: Metrics) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.0.get(key)
    }

    pub fn source(&self) -> Option<&str> {
        self.get(ANALYSIS_SOURCE_KEY).and_then(MetricValue::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Canonical output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub leaf_name: String,
    /// Raw classifier label; only set for model-sourced results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_label: Option<String>,
    pub disease: String,
    pub solution: String,
    pub metrics: Metrics,
}

impl AnalysisResult {
    pub fn source(&self) -> Option<&str> {
        self.metrics.source()
    }
}
