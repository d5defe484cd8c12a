//! Batch aggregation of snapshot records into a confusion matrix

pub mod matrix;
pub mod totals;

pub use matrix::{Conformance, ConfusionMatrix, Contribution};
pub use totals::Totals;

use crate::error::CoreError;
use crate::snapshot::SnapshotRecord;

/// Fold `records` into one confusion matrix.
///
/// Every record is validated first; the first malformed record, or one whose counts would
/// overflow the running sums, rejects the whole batch.
/// An empty batch yields an all-zero matrix.
pub fn aggregate<'a, I>(records: I) -> Result<ConfusionMatrix, CoreError>
where
    I: IntoIterator<Item = &'a SnapshotRecord>,
{
    let mut totals = Totals::default();
    for record in records {
        record.validate()?;
        totals.add_record(record)?;
    }
    Ok(totals.confusion_matrix())
}
