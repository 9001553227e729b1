//! Upload storage - raw image bytes on local disk

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Reference to a stored upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub timestamp: String,
    pub filename: String,
    pub path: PathBuf,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create the upload directory if needed.
    pub async fn open(dir: &Path) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        tracing::info!("Storing uploads in {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Write `bytes` as `image_<YYYYmmdd_HHMMSS>.jpg`.
    ///
    /// Two uploads within the same second share a name; the later one wins.
    pub async fn save(&self, bytes: &[u8]) -> std::io::Result<StoredImage> {
        let recorded_at = Utc::now();
        let timestamp = recorded_at
            .with_timezone(&chrono::Local)
            .format("%Y%m%d_%H%M%S")
            .to_string();
        let filename = format!("image_{}.jpg", timestamp);
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Saved {} bytes to {}", bytes.len(), path.display());

        Ok(StoredImage {
            timestamp,
            filename,
            path,
            recorded_at,
        })
    }
}
