//! Per-component sums across a batch of records

use super::matrix::{ConfusionMatrix, Contribution};
use crate::error::CoreError;
use crate::snapshot::SnapshotRecord;
use std::collections::BTreeMap;

/// Global per-name sums of the four record mappings.
///
/// Keys are the union over all records; a record that lacks a name contributes 0 for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub expected_ok: BTreeMap<String, i64>,
    pub expected_not_ok: BTreeMap<String, i64>,
    pub ok_detected: BTreeMap<String, i64>,
    pub not_ok_detected: BTreeMap<String, i64>,
}

impl Totals {
    pub fn from_records<'a, I>(records: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = &'a SnapshotRecord>,
    {
        let mut totals = Totals::default();
        for record in records {
            totals.add_record(record)?;
        }
        Ok(totals)
    }

    /// Accumulate one record, keyed by its `expected` mapping.
    ///
    /// A sum that would overflow rejects the record; `self` is left unchanged in that case.
    pub fn add_record(&mut self, record: &SnapshotRecord) -> Result<(), CoreError> {
        let mut next = self.clone();
        for name in record.names() {
            for (field, totals, counts) in [
                ("expected", &mut next.expected_ok, record.expected()),
                ("expected_not_ok", &mut next.expected_not_ok, record.expected_not_ok()),
                ("ok_detected", &mut next.ok_detected, record.ok_detected()),
                ("not_ok_detected", &mut next.not_ok_detected, record.not_ok_detected()),
            ] {
                accumulate(totals, name, count_or_zero(counts, name)).ok_or_else(|| {
                    CoreError::malformed(
                        record.timestamp(),
                        format!("sum of '{}' for '{}' overflows", field, name),
                    )
                })?;
            }
        }
        *self = next;
        Ok(())
    }

    /// Sorted names seen in any record.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.expected_ok.keys().map(String::as_str)
    }

    pub fn contribution(&self, name: &str) -> Contribution {
        Contribution::clip(
            count_or_zero(&self.expected_ok, name),
            count_or_zero(&self.expected_not_ok, name),
            count_or_zero(&self.ok_detected, name),
            count_or_zero(&self.not_ok_detected, name),
        )
    }

    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        self.labels()
            .map(|name| self.contribution(name))
            .fold(ConfusionMatrix::default(), |mut matrix, contribution| {
                matrix.add_contribution(contribution);
                matrix
            })
    }
}

/// Absent names count as zero.
pub fn count_or_zero(counts: &BTreeMap<String, i64>, name: &str) -> i64 {
    counts.get(name).copied().unwrap_or(0)
}

/// Add `value` to the running sum for `name`; `None` on overflow.
fn accumulate(counts: &mut BTreeMap<String, i64>, name: &str, value: i64) -> Option<()> {
    let sum = counts.entry(name.to_string()).or_insert(0);
    *sum = sum.checked_add(value)?;
    Some(())
}
