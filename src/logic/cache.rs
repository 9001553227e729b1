//! Latest-Result Cache - single slot, last writer wins

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::types::AnalysisResult;

/// Most recent analysis plus the upload it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    /// `YYYYmmdd_HHMMSS`, also used in the stored filename.
    pub timestamp: String,
    pub filename: String,
    pub path: String,
    pub recorded_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[derive(Debug, Default)]
pub struct LatestResultCache {
    slot: RwLock<Option<Arc<CacheEntry>>>,
}

impl LatestResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored entry.
    pub fn put(&self, entry: CacheEntry) {
        *self.slot.write() = Some(Arc::new(entry));
    }

    /// Current entry, or `None` before the first upload completes.
    pub fn get(&self) -> Option<Arc<CacheEntry>> {
        self.slot.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::heuristic::empty_result;

    fn entry(ts: &str) -> CacheEntry {
        CacheEntry {
            timestamp: ts.to_string(),
            filename: format!("image_{}.jpg", ts),
            path: format!("upload/image_{}.jpg", ts),
            recorded_at: Utc::now(),
            result: empty_result(),
        }
    }

    #[test]
    fn test_empty_before_first_put() {
        let cache = LatestResultCache::new();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_put_replaces() {
        let cache = LatestResultCache::new();
        cache.put(entry("20250101_000000"));
        cache.put(entry("20250101_000001"));
        assert_eq!(cache.get().unwrap().timestamp, "20250101_000001");
    }

    #[test]
    fn test_concurrent_writers_leave_one_entry() {
        let cache = Arc::new(LatestResultCache::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.put(entry(&format!("{:02}", i))))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let latest = cache.get().unwrap();
        let n: u32 = latest.timestamp.parse().unwrap();
        assert!(n < 16);
        assert_eq!(latest.filename, format!("image_{}.jpg", latest.timestamp));
    }
}
