//! Detector output sources

pub mod config;
pub mod detector;

pub use config::{DetectionConfig, VisualizationConfig};
pub use detector::{Frame, ReplayDetector};
