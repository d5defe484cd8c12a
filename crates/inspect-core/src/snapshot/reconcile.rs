//! Snapshot reconciler

use super::record::SnapshotRecord;
use crate::expectation::ExpectationModel;
use crate::taxonomy::ParsedLabel;
use chrono::Local;
use std::collections::BTreeMap;

/// Second-resolution local time; doubles as the persistence key.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reconcile one frame's detection labels against `model`, stamped with the current time.
pub fn reconcile<I>(labels: I, model: &ExpectationModel) -> SnapshotRecord
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    reconcile_at(labels, model, now_timestamp())
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Reconcile with an explicit timestamp.
///
/// Every tracked name appears in all four mappings, with zero counts if it was not seen.
/// Labels whose base name is not tracked by `model` are ignored.
pub fn reconcile_at<I>(labels: I, model: &ExpectationModel, timestamp: impl Into<String>) -> SnapshotRecord
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut ok_detected: BTreeMap<String, i64> =
        model.names().map(|name| (name.to_string(), 0)).collect();
    let mut not_ok_detected = ok_detected.clone();

    for label in labels {
        let label = label.as_ref();
        let parsed = ParsedLabel::parse(label);
        let counts = if parsed.state.is_conforming() {
            &mut ok_detected
        } else {
            &mut not_ok_detected
        };
        match counts.get_mut(parsed.base) {
            Some(count) => *count += 1,
            None => log::debug!("Ignoring detection '{}': not a tracked component", label),
        }
    }

    SnapshotRecord::new_unchecked(
        timestamp.into(),
        model.expected_ok_counts(),
        model.expected_not_ok_counts(),
        ok_detected,
        not_ok_detected,
    )
}
