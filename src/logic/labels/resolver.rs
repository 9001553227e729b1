//! Source fallback chains for labels and metadata.
//!
//! Each candidate source either yields a value or a [`SourceError`]; the
//! first non-empty value wins. Errors are logged and skipped, never fatal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::defaults::{default_labels, PLANT_VILLAGE};
use super::{ClassLabels, MetadataEntry, MetadataTable};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected layout in {path}: {reason}")]
    Layout { path: PathBuf, reason: String },
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// One candidate in a fallback chain.
pub trait Source<T>: Send + Sync {
    fn name(&self) -> String;
    fn load(&self) -> Result<T, SourceError>;
}

/// Values a chain can resolve to.
pub trait Resolvable: Default {
    fn is_empty(&self) -> bool;
}

impl Resolvable for ClassLabels {
    fn is_empty(&self) -> bool {
        ClassLabels::is_empty(self)
    }
}

impl Resolvable for MetadataTable {
    fn is_empty(&self) -> bool {
        MetadataTable::is_empty(self)
    }
}

/// Resolution outcome plus the name of the source that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Option<String>,
}

/// Walk `sources` in order and return the first non-empty value.
///
/// Resolves to `T::default()` with no source when every candidate is absent.
pub fn resolve<T: Resolvable>(kind: &str, sources: &[Box<dyn Source<T>>]) -> Resolved<T> {
    for source in sources {
        match source.load() {
            Ok(value) if !value.is_empty() => {
                tracing::info!("Resolved {} from {}", kind, source.name());
                return Resolved {
                    value,
                    source: Some(source.name()),
                };
            }
            Ok(_) => {
                tracing::debug!("{} source {} is empty, trying next", kind, source.name());
            }
            Err(SourceError::Missing(path)) => {
                tracing::debug!("{} source {} not present", kind, path.display());
            }
            Err(e) => {
                tracing::warn!("Skipping {} source {}: {}", kind, source.name(), e);
            }
        }
    }

    tracing::warn!("No {} source available", kind);
    Resolved {
        value: T::default(),
        source: None,
    }
}

// ============================================================================
// FILE HELPERS
// ============================================================================

fn read_source(path: &Path) -> Result<String, SourceError> {
    if !path.exists() {
        return Err(SourceError::Missing(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let content = read_source(path)?;
    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// LABEL SOURCES
// ============================================================================

/// Line-delimited UTF-8 label file. Lines are trimmed, blanks skipped.
pub struct LineFileLabels {
    pub path: PathBuf,
}

impl Source<ClassLabels> for LineFileLabels {
    fn name(&self) -> String {
        format!("label file {}", self.path.display())
    }

    fn load(&self) -> Result<ClassLabels, SourceError> {
        let content = read_source(&self.path)?;
        let labels = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(ClassLabels::new(labels))
    }
}

/// JSON file shaped `{"labels": [...]}`. Non-string items are stringified.
pub struct JsonLabels {
    pub path: PathBuf,
}

impl Source<ClassLabels> for JsonLabels {
    fn name(&self) -> String {
        format!("label json {}", self.path.display())
    }

    fn load(&self) -> Result<ClassLabels, SourceError> {
        let json = read_json(&self.path)?;
        let items = json
            .get("labels")
            .and_then(Value::as_array)
            .ok_or_else(|| SourceError::Layout {
                path: self.path.clone(),
                reason: "missing \"labels\" array".to_string(),
            })?;

        let labels = items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        Ok(ClassLabels::new(labels))
    }
}

/// Built-in PlantVillage taxonomy.
pub struct BuiltinLabels;

impl Source<ClassLabels> for BuiltinLabels {
    fn name(&self) -> String {
        "built-in taxonomy".to_string()
    }

    fn load(&self) -> Result<ClassLabels, SourceError> {
        Ok(ClassLabels::new(default_labels()))
    }
}

// ============================================================================
// METADATA SOURCES
// ============================================================================

/// JSON object mapping label → `{disease, solution}`.
///
/// Entries whose value is not such an object (a `labels` array sharing the
/// file, for instance) are skipped.
pub struct JsonMetadata {
    pub path: PathBuf,
}

impl Source<MetadataTable> for JsonMetadata {
    fn name(&self) -> String {
        format!("metadata json {}", self.path.display())
    }

    fn load(&self) -> Result<MetadataTable, SourceError> {
        let json = read_json(&self.path)?;
        let object = json.as_object().ok_or_else(|| SourceError::Layout {
            path: self.path.clone(),
            reason: "top level is not an object".to_string(),
        })?;

        let entries: HashMap<String, MetadataEntry> = object
            .iter()
            .filter(|(_, value)| value.is_object())
            .filter_map(|(label, value)| {
                match serde_json::from_value::<MetadataEntry>(value.clone()) {
                    Ok(entry) => Some((label.clone(), entry)),
                    Err(e) => {
                        tracing::debug!("Skipping metadata entry {}: {}", label, e);
                        None
                    }
                }
            })
            .collect();

        Ok(MetadataTable::new(entries))
    }
}

/// Built-in care table for the PlantVillage taxonomy.
pub struct BuiltinMetadata;

impl Source<MetadataTable> for BuiltinMetadata {
    fn name(&self) -> String {
        "built-in care table".to_string()
    }

    fn load(&self) -> Result<MetadataTable, SourceError> {
        let entries = PLANT_VILLAGE
            .iter()
            .map(|(label, disease, solution)| {
                (label.to_string(), MetadataEntry::new(disease, solution))
            })
            .collect();
        Ok(MetadataTable::new(entries))
    }
}

// ============================================================================
// STANDARD CHAINS
// ============================================================================

/// Label file → label JSON → built-in.
pub fn label_chain(txt_path: &Path, json_path: &Path) -> Vec<Box<dyn Source<ClassLabels>>> {
    vec![
        Box::new(LineFileLabels {
            path: txt_path.to_path_buf(),
        }),
        Box::new(JsonLabels {
            path: json_path.to_path_buf(),
        }),
        Box::new(BuiltinLabels),
    ]
}

/// Metadata JSON → built-in.
pub fn metadata_chain(json_path: &Path) -> Vec<Box<dyn Source<MetadataTable>>> {
    vec![
        Box::new(JsonMetadata {
            path: json_path.to_path_buf(),
        }),
        Box::new(BuiltinMetadata),
    ]
}
