//! Detection configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Recorded detector output to replay
    pub frames_file: PathBuf,
    pub confidence_threshold: f64,
    /// Class-aware NMS IoU threshold; `None` keeps detector output as is
    pub nms_threshold: Option<f64>,
    pub visualization: VisualizationConfig,
}

/// Annotated frame output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub save_annotated_frames: bool,
    pub output_dir: PathBuf,
    pub line_thickness: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            frames_file: "assets/json/frames.json".into(),
            confidence_threshold: 0.3,
            nms_threshold: None,
            visualization: VisualizationConfig::default(),
        }
    }
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            save_annotated_frames: false,
            output_dir: "YOLO_Confusion_Snaps/frames".into(),
            line_thickness: 2,
        }
    }
}

impl DetectionConfig {
    /// Replay `frames_file` with class-aware NMS enabled
    pub fn with_class_nms(frames_file: impl Into<PathBuf>, threshold: f64) -> Self {
        Self {
            frames_file: frames_file.into(),
            nms_threshold: Some(threshold),
            ..Default::default()
        }
    }
}
