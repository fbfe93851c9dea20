//! Recommendation table loading
//!
//! The table maps a category name to free-text advice. It is read once at
//! startup from a plain text file with one `Name: recommendation` entry per
//! line and never modified afterwards, so it can be shared across request
//! handlers behind an `Arc` without locking.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::Result;

/// Text returned when a category has no entry in the table
pub const FALLBACK_RECOMMENDATION: &str = "No recommendation available.";

/// Immutable mapping from category name to recommendation text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationTable {
    entries: HashMap<String, String>,
}

impl RecommendationTable {
    /// Load the table from a colon-delimited text file
    ///
    /// A missing or unreadable file is returned as [`crate::Error::Io`];
    /// callers decide whether that is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::parse(&content);
        info!(
            "Loaded {} recommendations from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse table content
    ///
    /// Each line is split on its first colon and both halves are trimmed.
    /// Lines without a colon are skipped. Later duplicates replace earlier ones.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for (line_no, line) in content.lines().enumerate() {
            match line.trim().split_once(':') {
                Some((name, recommendation)) => {
                    entries.insert(name.trim().to_string(), recommendation.trim().to_string());
                }
                None => {
                    if !line.trim().is_empty() {
                        debug!("Skipping recommendation line {} (no colon)", line_no + 1);
                    }
                }
            }
        }
        Self { entries }
    }

    /// Exact-case lookup of a category name
    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries.get(category).map(String::as_str)
    }

    /// Lookup with the fixed fallback text for absent categories
    pub fn recommendation_for(&self, category: &str) -> &str {
        self.get(category).unwrap_or(FALLBACK_RECOMMENDATION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RecommendationTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
