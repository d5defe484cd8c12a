//! Per-capture reconciliation of detector output against expectations

pub mod reconcile;
pub mod record;

pub use reconcile::{now_timestamp, reconcile, reconcile_at, TIMESTAMP_FORMAT};
pub use record::{SnapshotRecord, SnapshotSummary};
