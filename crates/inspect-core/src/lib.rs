//! Inspection core
//!
//! Classification and reconciliation of detector output against operator-declared
//! expectations, and aggregation of snapshot records into a confusion matrix.

pub mod aggregate;
pub mod error;
pub mod expectation;
pub mod snapshot;
pub mod store;
pub mod taxonomy;

// Re-export commonly used types
pub use aggregate::{aggregate, Conformance, ConfusionMatrix, Contribution, Totals};
pub use error::{CoreError, TaxonomyError};
pub use expectation::{ConsolePrompt, CountPrompt, Expectation, ExpectationModel};
pub use snapshot::{now_timestamp, reconcile, reconcile_at, SnapshotRecord};
pub use store::{JsonDirStore, SnapshotStore};
pub use taxonomy::{resolve_base_names, DetectionState, ParsedLabel, Vocabulary};

pub type Result<T> = std::result::Result<T, CoreError>;
