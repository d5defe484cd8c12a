//! Detector class-name vocabulary loading

use super::label::resolve_base_names;
use crate::error::{CoreError, TaxonomyError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Full set of labels a detector can emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<String>,
}

impl Vocabulary {
    /// Load a class-names file, one label per line. Blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CoreError::io("open", path, e))?;
        let reader = BufReader::new(file);

        let mut labels = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| CoreError::io("read", path, e))?;
            let label = line.trim();
            if label.is_empty() {
                continue;
            }
            labels.push(label.to_string());
        }

        log::info!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Sorted base component names reachable from this vocabulary.
    pub fn base_names(&self) -> Result<Vec<String>, TaxonomyError> {
        resolve_base_names(&self.labels)
    }
}
