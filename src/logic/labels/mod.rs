//! Labels Module - class labels and care metadata
//!
//! Resolved once at startup, read-only afterwards.

pub mod defaults;
pub mod resolver;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use resolver::{label_chain, metadata_chain, resolve, Resolved};

// ============================================================================
// CLASS LABELS
// ============================================================================

/// Ordered class labels; index `i` is model output position `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassLabels(Vec<String>);

impl ClassLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// Bounds-checked lookup.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

// ============================================================================
// METADATA
// ============================================================================

/// Care metadata for one label. Absent fields keep the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
}

impl MetadataEntry {
    pub fn new(disease: &str, solution: &str) -> Self {
        Self {
            disease: Some(disease.to_string()),
            solution: Some(solution.to_string()),
        }
    }
}

/// Label → care metadata table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable(HashMap<String, MetadataEntry>);

impl MetadataTable {
    pub fn new(entries: HashMap<String, MetadataEntry>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&MetadataEntry> {
        self.0.get(key)
    }

    /// Exact raw label first, then the friendly label.
    pub fn lookup(&self, raw: &str, friendly: &str) -> Option<&MetadataEntry> {
        self.get(raw).or_else(|| self.get(friendly))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// FRIENDLY LABELS
// ============================================================================

/// Human readable form of a raw taxonomy label.
///
/// `"Corn_(maize)___Common_rust_"` becomes `"Corn (Maize) - Common Rust"`.
/// An empty raw label becomes `"Class {index}"`.
pub fn friendly_label(raw: &str, index: usize) -> String {
    if raw.is_empty() {
        return format!("Class {}", index);
    }

    let spaced = raw.replace("___", " - ").replace("__", " ").replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Uppercase the first cased character of every word, lowercase the rest.
/// A word starts after any character that is not a cased letter.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for c in text.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && prev_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}
