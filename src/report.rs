//! Offline confusion matrix report

use anyhow::{Context, Result};
use inspect_core::{aggregate, ConfusionMatrix, SnapshotStore};
use inspect_cv::HeatmapRenderer;
use std::io::Write;
use std::path::Path;

/// Aggregate every stored record, print the matrix and optionally render the heatmap.
pub fn run_report<S: SnapshotStore, W: Write>(
    store: &S,
    heatmap: Option<(&HeatmapRenderer, &Path)>,
    out: &mut W,
) -> Result<ConfusionMatrix> {
    let records = store
        .load_all()
        .with_context(|| format!("Failed to load snapshots from {}", store.location().display()))?;
    let matrix = aggregate(&records)?;

    writeln!(out, "Overall Confusion Matrix ({} snapshots)", records.len())?;
    writeln!(out)?;
    write!(out, "{}", matrix)?;
    match matrix.accuracy() {
        Some(accuracy) => writeln!(out, "\nAccuracy: {:.1}%", accuracy * 100.0)?,
        None => writeln!(out, "\nNo component instances recorded")?,
    }

    if let Some((renderer, path)) = heatmap {
        renderer.save(&matrix, path)?;
        writeln!(out, "Heatmap saved: {}", path.display())?;
    }

    Ok(matrix)
}
