//! Wire models for the hub firmware

use serde::Serialize;

use crate::logic::types::Metrics;
use crate::logic::CacheEntry;

/// Body of `GET /result`, also the forwarded payload.
///
/// `species`, `condition` and `recommendation` duplicate the diagnosis
/// fields under the names the hub's display code reads.
#[derive(Debug, Clone, Serialize)]
pub struct ResultBody {
    pub timestamp: String,
    pub filename: String,
    pub path: String,
    pub leaf_name: String,
    pub disease: String,
    pub solution: String,
    pub species: String,
    pub condition: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

impl From<&CacheEntry> for ResultBody {
    fn from(entry: &CacheEntry) -> Self {
        let result = &entry.result;
        Self {
            timestamp: entry.timestamp.clone(),
            filename: entry.filename.clone(),
            path: entry.path.clone(),
            leaf_name: result.leaf_name.clone(),
            disease: result.disease.clone(),
            solution: result.solution.clone(),
            species: result.leaf_name.clone(),
            condition: result.disease.clone(),
            recommendation: result.solution.clone(),
            metrics: (!result.metrics.is_empty()).then(|| result.metrics.clone()),
        }
    }
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: String,
    pub size_bytes: usize,
    #[serde(flatten)]
    pub result: ResultBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::heuristic::{analyze, empty_result};
    use chrono::Utc;
    use image::{Rgb, RgbImage};

    fn entry(result: crate::logic::types::AnalysisResult) -> CacheEntry {
        CacheEntry {
            timestamp: "20250301_080910".into(),
            filename: "image_20250301_080910.jpg".into(),
            path: "upload/image_20250301_080910.jpg".into(),
            recorded_at: Utc::now(),
            result,
        }
    }

    #[test]
    fn test_result_body_aliases() {
        let result = analyze(&RgbImage::from_pixel(4, 4, Rgb([50, 200, 50])));
        let body = serde_json::to_value(ResultBody::from(&entry(result))).unwrap();

        assert_eq!(body["species"], "Healthy Leaf");
        assert_eq!(body["leaf_name"], body["species"]);
        assert_eq!(body["condition"], body["disease"]);
        assert_eq!(body["recommendation"], body["solution"]);
        assert_eq!(body["metrics"]["analysis_source"], "heuristic");
        assert!(body.get("leaf_label").is_none());
    }

    #[test]
    fn test_classifier_label_stays_off_the_wire() {
        let mut result = analyze(&RgbImage::from_pixel(4, 4, Rgb([50, 200, 50])));
        result.leaf_label = Some("Tomato___healthy".into());
        let body = serde_json::to_value(ResultBody::from(&entry(result))).unwrap();
        assert!(body.get("leaf_label").is_none());
        assert_eq!(body["species"], "Healthy Leaf");
    }

    #[test]
    fn test_empty_metrics_omitted() {
        let body = serde_json::to_value(ResultBody::from(&entry(empty_result()))).unwrap();
        assert!(body.get("metrics").is_none());
    }

    #[test]
    fn test_upload_response_flattens_result() {
        let response = UploadResponse {
            status: "success",
            message: "Image saved as image_20250301_080910.jpg".into(),
            size_bytes: 1234,
            result: ResultBody::from(&entry(empty_result())),
        };
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["size_bytes"], 1234);
        assert_eq!(body["filename"], "image_20250301_080910.jpg");
        assert_eq!(body["disease"], "No image data");
    }
}
