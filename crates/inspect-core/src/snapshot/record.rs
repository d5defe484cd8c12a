//! Persisted snapshot record

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reconciliation result for one capture event.
///
/// All four count mappings share the key set of the expectation model the record was
/// built from. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    timestamp: String,
    expected: BTreeMap<String, i64>,
    expected_not_ok: BTreeMap<String, i64>,
    ok_detected: BTreeMap<String, i64>,
    not_ok_detected: BTreeMap<String, i64>,
}

impl SnapshotRecord {
    pub(crate) fn new_unchecked(
        timestamp: String,
        expected: BTreeMap<String, i64>,
        expected_not_ok: BTreeMap<String, i64>,
        ok_detected: BTreeMap<String, i64>,
        not_ok_detected: BTreeMap<String, i64>,
    ) -> Self {
        Self {
            timestamp,
            expected,
            expected_not_ok,
            ok_detected,
            not_ok_detected,
        }
    }

    /// Assemble a record from its parts, rejecting mismatched key sets.
    pub fn from_parts(
        timestamp: impl Into<String>,
        expected: BTreeMap<String, i64>,
        expected_not_ok: BTreeMap<String, i64>,
        ok_detected: BTreeMap<String, i64>,
        not_ok_detected: BTreeMap<String, i64>,
    ) -> Result<Self, CoreError> {
        let record = Self::new_unchecked(
            timestamp.into(),
            expected,
            expected_not_ok,
            ok_detected,
            not_ok_detected,
        );
        record.validate()?;
        Ok(record)
    }

    /// Check that the four mappings have identical key sets.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, counts) in [
            ("expected_not_ok", &self.expected_not_ok),
            ("ok_detected", &self.ok_detected),
            ("not_ok_detected", &self.not_ok_detected),
        ] {
            if !counts.keys().eq(self.expected.keys()) {
                return Err(CoreError::malformed(
                    &self.timestamp,
                    format!("key set of '{}' differs from 'expected'", field),
                ));
            }
        }
        Ok(())
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn expected(&self) -> &BTreeMap<String, i64> {
        &self.expected
    }

    pub fn expected_not_ok(&self) -> &BTreeMap<String, i64> {
        &self.expected_not_ok
    }

    pub fn ok_detected(&self) -> &BTreeMap<String, i64> {
        &self.ok_detected
    }

    pub fn not_ok_detected(&self) -> &BTreeMap<String, i64> {
        &self.not_ok_detected
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expected.keys().map(String::as_str)
    }

    /// Console summary of the detected counts.
    pub fn summary(&self) -> SnapshotSummary<'_> {
        SnapshotSummary { record: self }
    }
}

pub struct SnapshotSummary<'a> {
    record: &'a SnapshotRecord,
}

impl fmt::Display for SnapshotSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        writeln!(f, "OK counts:")?;
        for (name, count) in &record.ok_detected {
            let expected = record.expected.get(name).copied().unwrap_or(0);
            writeln!(f, "  {}: {} / {}", name, count, expected)?;
        }
        writeln!(f, "NOT OK counts:")?;
        for (name, count) in &record.not_ok_detected {
            writeln!(f, "  {}: {}", name, count)?;
        }
        Ok(())
    }
}
