//! Error types for the inspection core

use std::path::PathBuf;
use thiserror::Error;

/// Label vocabulary violations found while resolving base names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("label '{label}' strips to base '{base}', which still ends in a reserved suffix")]
    AmbiguousSuffix { label: String, base: String },

    #[error("label '{label}' has an empty base name")]
    EmptyBase { label: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error("count input unavailable for '{name}': {reason}")]
    InputUnavailable { name: String, reason: String },

    #[error("malformed snapshot record {source_name}: {reason}")]
    MalformedRecord { source_name: String, reason: String },

    #[error("failed to {action} {path:?}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot record {timestamp}")]
    Encode {
        timestamp: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::MalformedRecord {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
