//! Analysis pipeline
//!
//! image bytes → heuristic (always) → model (if loaded) → composer → cache.
//! Everything except the model run is lock-free.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbImage;
use serde::Serialize;

use super::cache::{CacheEntry, LatestResultCache};
use super::composer::compose;
use super::heuristic;
use super::labels::{label_chain, metadata_chain, resolve, ClassLabels, MetadataTable, Resolved};
use super::model::{EngineStatus, ModelEngine};
use super::types::AnalysisResult;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid image data: {0}")]
    Decode(#[from] image::ImageError),
}

/// Where startup resolution looks for its inputs.
#[derive(Debug, Clone)]
pub struct PipelineSources {
    pub labels_txt: PathBuf,
    pub labels_json: PathBuf,
    pub metadata_json: PathBuf,
    pub model: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source: Option<String>,
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub engine: EngineStatus,
    pub labels: SourceStatus,
    pub metadata: SourceStatus,
    pub has_result: bool,
}

pub struct AnalysisPipeline {
    labels: Resolved<ClassLabels>,
    metadata: Resolved<MetadataTable>,
    engine: ModelEngine,
    cache: LatestResultCache,
}

impl AnalysisPipeline {
    /// Resolve labels and metadata and try to load the model.
    ///
    /// Never fails: missing or broken sources degrade to defaults and a
    /// missing model leaves the heuristic as the only tier.
    pub fn initialize(sources: &PipelineSources) -> Self {
        let labels = resolve("labels", &label_chain(&sources.labels_txt, &sources.labels_json));
        let metadata = resolve("metadata", &metadata_chain(&sources.metadata_json));
        let engine = ModelEngine::load(&sources.model);

        if let Some(expected) = engine.signature().and_then(|s| s.output_len) {
            if expected != labels.value.len() {
                tracing::warn!(
                    "Model declares {} outputs but {} labels were resolved",
                    expected,
                    labels.value.len()
                );
            }
        }

        Self::from_parts(labels, metadata, engine)
    }

    pub fn from_parts(
        labels: Resolved<ClassLabels>,
        metadata: Resolved<MetadataTable>,
        engine: ModelEngine,
    ) -> Self {
        Self {
            labels,
            metadata,
            engine,
            cache: LatestResultCache::new(),
        }
    }

    /// Analyze one uploaded image.
    ///
    /// A zero-byte payload yields the degenerate "no image data" result.
    /// Model failures fall back to the heuristic for this call only.
    pub fn analyze(&self, image_bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        if image_bytes.is_empty() {
            return Ok(heuristic::empty_result());
        }

        let img = image::load_from_memory(image_bytes)?.to_rgb8();
        Ok(self.analyze_image(&img))
    }

    pub fn analyze_image(&self, img: &RgbImage) -> AnalysisResult {
        let heuristic = heuristic::analyze(img);
        if !self.engine.is_loaded() || heuristic.metrics.is_empty() {
            return heuristic;
        }

        match self.engine.classify(img, &self.labels.value) {
            Ok(prediction) => {
                tracing::debug!(
                    "Model predicted class {} ({:.3})",
                    prediction.class_index,
                    prediction.confidence
                );
                compose(heuristic, Some(&prediction), &self.metadata.value)
            }
            Err(e) => {
                tracing::warn!("Model inference failed ({}), using heuristic result", e);
                compose(heuristic, None, &self.metadata.value)
            }
        }
    }

    pub fn publish(&self, entry: CacheEntry) {
        self.cache.put(entry);
    }

    pub fn latest(&self) -> Option<Arc<CacheEntry>> {
        self.cache.get()
    }

    #[cfg(test)]
    pub fn labels(&self) -> &ClassLabels {
        &self.labels.value
    }

    #[cfg(test)]
    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata.value
    }

    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            engine: self.engine.status(),
            labels: SourceStatus {
                source: self.labels.source.clone(),
                entries: self.labels.value.len(),
            },
            metadata: SourceStatus {
                source: self.metadata.source.clone(),
                entries: self.metadata.value.len(),
            },
            has_result: self.cache.get().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::labels::MetadataEntry;
    use crate::logic::model::inference::tests::RedChannelBackend;
    use crate::logic::types::MetricValue;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::collections::HashMap;
    use std::io::Cursor;

    fn png(red: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(10, 10, Rgb([red, 200, 50]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn resolved<T>(value: T) -> Resolved<T> {
        Resolved {
            value,
            source: Some("test".into()),
        }
    }

    fn loaded_pipeline() -> AnalysisPipeline {
        let labels = ClassLabels::new((0..256).map(|i| format!("Leaf___type_{}", i)).collect());
        let mut entries = HashMap::new();
        entries.insert(
            "Leaf___type_7".to_string(),
            MetadataEntry::new("Type Seven Blight", "Remove affected leaves."),
        );
        AnalysisPipeline::from_parts(
            resolved(labels),
            resolved(MetadataTable::new(entries)),
            ModelEngine::with_backend(Box::new(RedChannelBackend::new()), "test"),
        )
    }

    fn heuristic_pipeline() -> AnalysisPipeline {
        let dir = tempfile::TempDir::new().unwrap();
        AnalysisPipeline::initialize(&PipelineSources {
            labels_txt: dir.path().join("leaf_labels.txt"),
            labels_json: dir.path().join("leaf_labels.json"),
            metadata_json: dir.path().join("leaf_labels.json"),
            model: dir.path().join("leaf_classifier.onnx"),
        })
    }

    #[test]
    fn test_without_model_uses_heuristic() {
        let pipeline = heuristic_pipeline();
        assert!(!pipeline.status().engine.model_loaded);
        assert_eq!(pipeline.labels().len(), 38);
        assert_eq!(pipeline.metadata().len(), 38);

        for red in [0u8, 50, 120, 250] {
            let result = pipeline.analyze(&png(red)).unwrap();
            assert_eq!(result.source(), Some("heuristic"));
            assert_eq!(result.leaf_label, None);
        }
        assert_eq!(pipeline.status().engine.inference_count, 0);
    }

    #[test]
    fn test_invalid_bytes_are_decode_error() {
        let pipeline = heuristic_pipeline();
        let err = pipeline.analyze(b"definitely not an image");
        assert!(matches!(err, Err(AnalysisError::Decode(_))));
    }

    #[test]
    fn test_empty_payload_is_degenerate_result() {
        let pipeline = loaded_pipeline();
        let result = pipeline.analyze(&[]).unwrap();
        assert_eq!(result, heuristic::empty_result());
        assert_eq!(pipeline.status().engine.inference_count, 0);
    }

    #[test]
    fn test_model_result_with_metadata_override() {
        let pipeline = loaded_pipeline();
        let result = pipeline.analyze(&png(7)).unwrap();

        assert_eq!(result.source(), Some("model"));
        assert_eq!(result.leaf_name, "Leaf - Type 7");
        assert_eq!(result.leaf_label.as_deref(), Some("Leaf___type_7"));
        assert_eq!(result.disease, "Type Seven Blight");
        assert_eq!(result.solution, "Remove affected leaves.");
        assert!(result.metrics.get("brightness").is_some());
    }

    #[test]
    fn test_model_result_without_metadata_keeps_heuristic_text() {
        let pipeline = loaded_pipeline();
        let result = pipeline.analyze(&png(8)).unwrap();
        assert_eq!(result.source(), Some("model"));
        assert_eq!(result.disease, "No obvious disease");
    }

    #[test]
    fn test_inference_failure_falls_back_for_one_request() {
        let mut backend = RedChannelBackend::new();
        backend.fail_on_red = Some(9);
        let pipeline = AnalysisPipeline::from_parts(
            resolved(ClassLabels::new((0..256).map(|i| format!("Leaf___type_{}", i)).collect())),
            resolved(MetadataTable::default()),
            ModelEngine::with_backend(Box::new(backend), "test"),
        );

        let failed = pipeline.analyze(&png(9)).unwrap();
        assert_eq!(failed.source(), Some("heuristic"));
        assert_eq!(failed.leaf_label, None);
        assert!(failed.metrics.get("model_confidence").is_none());

        let next = pipeline.analyze(&png(10)).unwrap();
        assert_eq!(next.source(), Some("model"));
        assert_eq!(next.leaf_label.as_deref(), Some("Leaf___type_10"));

        let status = pipeline.status().engine;
        assert!(status.model_loaded);
        assert_eq!(status.failure_count, 1);
    }

    #[test]
    fn test_latest_empty_until_published() {
        let pipeline = loaded_pipeline();
        assert!(pipeline.latest().is_none());
        assert!(!pipeline.status().has_result);

        let result = pipeline.analyze(&png(3)).unwrap();
        pipeline.publish(CacheEntry {
            timestamp: "20250101_120000".into(),
            filename: "image_20250101_120000.jpg".into(),
            path: "upload/image_20250101_120000.jpg".into(),
            recorded_at: chrono::Utc::now(),
            result: result.clone(),
        });
        assert_eq!(pipeline.latest().unwrap().result, result);
    }

    #[test]
    fn test_concurrent_analyze_keeps_results_separate() {
        let pipeline = Arc::new(loaded_pipeline());

        let handles: Vec<_> = (0..50u8)
            .map(|i| {
                let pipeline = Arc::clone(&pipeline);
                std::thread::spawn(move || {
                    let red = i * 5;
                    (red, pipeline.analyze(&png(red)).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (red, result) = handle.join().unwrap();
            assert_eq!(result.source(), Some("model"));
            assert_eq!(
                result.metrics.get("model_class_index"),
                Some(&MetricValue::Int(red as i64))
            );
            let expected = crate::logic::types::round_to(0.5 + red as f64 / 1024.0, 4);
            let confidence = result.metrics.get("model_confidence").and_then(|v| v.as_f64());
            assert!((confidence.unwrap() - expected).abs() < 1e-4);
        }

        let status = pipeline.status().engine;
        assert_eq!(status.inference_count, 50);
        assert_eq!(status.failure_count, 0);
    }
}
