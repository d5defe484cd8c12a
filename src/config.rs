//! Station configuration

use anyhow::{bail, Context, Result};
use inspect_core::taxonomy::validate_base_name;
use inspect_cv::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "inspect.json";

/// Top-level configuration, read from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Detector class names, one per line
    pub labels_file: PathBuf,
    /// Snapshot record directory
    pub log_dir: PathBuf,
    /// Physical count of each component on the board
    pub totals: BTreeMap<String, i64>,
    pub detection: DetectionConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Write the heatmap PNG here when set
    pub heatmap_path: Option<PathBuf>,
    pub cell_size: u32,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            labels_file: "assets/txt/classes.txt".into(),
            log_dir: "YOLO_Confusion_Snaps".into(),
            totals: default_board_totals(),
            detection: DetectionConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            heatmap_path: None,
            cell_size: 160,
        }
    }
}

/// Component counts of the reference board
fn default_board_totals() -> BTreeMap<String, i64> {
    [
        ("B_MOV", 1),
        ("G_MOV", 1),
        ("MOV", 6),
        ("b_pin", 2),
        ("bs_pin", 1),
        ("cap_b", 2),
        ("cap_s", 1),
        ("dual_F", 1),
        ("fuse", 1),
        ("jumper_cap", 1),
        ("r_pin", 1),
        ("w_pin", 1),
        ("ws_pin", 1),
    ]
    .into_iter()
    .map(|(name, count)| (name.to_string(), count))
    .collect()
}

impl InspectConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Totals must be keyed by unambiguous base names and be non-negative.
    /// Heatmap cells must have a size.
    pub fn validate(&self) -> Result<()> {
        for (name, &count) in &self.totals {
            validate_base_name(name, name)
                .with_context(|| format!("Invalid component '{}' in totals", name))?;
            if count < 0 {
                bail!("Total for '{}' is negative ({})", name, count);
            }
        }
        if self.report.cell_size == 0 {
            bail!("report.cell_size must be at least 1");
        }
        Ok(())
    }
}
