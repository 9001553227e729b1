//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::logic::PipelineSources;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub bind_addr: String,

    /// Server port
    pub port: u16,

    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,

    /// Line-delimited label file
    pub labels_txt_path: PathBuf,

    /// JSON file with a `labels` array
    pub labels_json_path: PathBuf,

    /// JSON label → {disease, solution} table
    pub metadata_json_path: PathBuf,

    /// ONNX classifier
    pub model_path: PathBuf,

    /// Where published results are forwarded, if anywhere
    pub forward_url: Option<String>,

    /// Forwarding request timeout
    pub forward_timeout: Duration,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| ".".to_string()));
        let path_or = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        let labels_json_path = path_or("LABELS_JSON_PATH", data_dir.join("leaf_labels.json"));

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            upload_dir: path_or("UPLOAD_DIR", data_dir.join("upload")),

            labels_txt_path: path_or("LABELS_TXT_PATH", data_dir.join("leaf_labels.txt")),

            metadata_json_path: path_or("METADATA_JSON_PATH", labels_json_path.clone()),

            labels_json_path,

            model_path: path_or("MODEL_PATH", data_dir.join("leaf_classifier.onnx")),

            forward_url: lookup("FORWARD_URL").filter(|url| !url.trim().is_empty()),

            forward_timeout: Duration::from_secs(
                lookup("FORWARD_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn pipeline_sources(&self) -> PipelineSources {
        PipelineSources {
            labels_txt: self.labels_txt_path.clone(),
            labels_json: self.labels_json_path.clone(),
            metadata_json: self.metadata_json_path.clone(),
            model: self.model_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.port, 8000);
        assert_eq!(c.upload_dir, PathBuf::from("./upload"));
        assert_eq!(c.labels_txt_path, PathBuf::from("./leaf_labels.txt"));
        assert_eq!(c.metadata_json_path, c.labels_json_path);
        assert_eq!(c.forward_url, None);
        assert_eq!(c.forward_timeout, Duration::from_secs(5));
        assert!(!c.is_production());
    }

    #[test]
    fn test_data_dir_and_overrides() {
        let c = config(&[
            ("DATA_DIR", "/srv/leafhub"),
            ("PORT", "9100"),
            ("METADATA_JSON_PATH", "/etc/leafhub/care.json"),
            ("FORWARD_URL", "  "),
            ("ENVIRONMENT", "production"),
        ]);
        assert_eq!(c.port, 9100);
        assert_eq!(c.model_path, PathBuf::from("/srv/leafhub/leaf_classifier.onnx"));
        assert_eq!(c.labels_json_path, PathBuf::from("/srv/leafhub/leaf_labels.json"));
        assert_eq!(c.metadata_json_path, PathBuf::from("/etc/leafhub/care.json"));
        assert_eq!(c.forward_url, None);
        assert!(c.is_production());
    }
}
