//! Result Composer - merges heuristic and model output
//!
//! Pure; performs no I/O.

use super::labels::MetadataTable;
use super::model::ModelPrediction;
use super::types::{AnalysisResult, AnalysisSource, Metrics};

const CONFIDENCE_DECIMALS: u32 = 4;

/// Build the final result.
///
/// Without a prediction the heuristic result is returned verbatim. With one,
/// the model label names the leaf, disease/solution default to the heuristic
/// text and are overridden by metadata keyed on the raw label, then on the
/// friendly label. Model metrics win on key collision.
pub fn compose(
    heuristic: AnalysisResult,
    prediction: Option<&ModelPrediction>,
    metadata: &MetadataTable,
) -> AnalysisResult {
    let Some(prediction) = prediction else {
        return heuristic;
    };

    let label = if prediction.raw_label.is_empty() {
        prediction.friendly_label.clone()
    } else {
        prediction.raw_label.clone()
    };

    let mut disease = heuristic.disease;
    let mut solution = heuristic.solution;
    if let Some(entry) = metadata.lookup(&prediction.raw_label, &prediction.friendly_label) {
        if let Some(d) = &entry.disease {
            disease = d.clone();
        }
        if let Some(s) = &entry.solution {
            solution = s.clone();
        }
    }

    let mut model_metrics = Metrics::new();
    model_metrics.insert_float(
        "model_confidence",
        prediction.confidence as f64,
        CONFIDENCE_DECIMALS,
    );
    model_metrics.insert_int("model_class_index", prediction.class_index as i64);
    model_metrics.insert_text("model_label", label.clone());
    model_metrics.set_source(AnalysisSource::Model);

    let mut metrics = heuristic.metrics;
    metrics.extend(model_metrics);

    AnalysisResult {
        leaf_name: prediction.friendly_label.clone(),
        leaf_label: Some(label),
        disease,
        solution,
        metrics,
    }
}
