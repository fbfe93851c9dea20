//! Reference dataset loading
//!
//! An optional JSON object or array of reference records, loaded once at
//! startup.
//! A missing file is normal (the dataset is not shipped) and yields an empty
//! dataset; a file that exists but is not valid JSON is a configuration error.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::{Error, Result};

/// Read-only reference records, keyed (object) or positional (array)
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    records: Value,
}

impl ReferenceDataset {
    /// Load the dataset, treating a missing file as empty
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Reference dataset not found at {} (continuing without it)", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let dataset = Self::from_json(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Reference dataset loaded with {} records", dataset.len());
        Ok(dataset)
    }

    /// Parse dataset content; the top level must be a JSON object or array
    pub fn from_json(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content) {
            Ok(records @ (Value::Object(_) | Value::Array(_))) => Ok(Self { records }),
            Ok(_) => Err(Error::InvalidInput(
                "dataset must be a JSON object or array".to_string(),
            )),
            Err(e) => Err(Error::InvalidInput(format!("invalid dataset JSON: {}", e))),
        }
    }

    /// Record by key; always `None` for an array dataset
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.records.get(key)
    }

    /// Record by position; always `None` for an object dataset
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.records.get(index)
    }

    /// Number of keys (object) or elements (array)
    pub fn len(&self) -> usize {
        match &self.records {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
