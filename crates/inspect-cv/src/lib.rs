//! Inspection detection library
//!
//! Detector-side types for the inspection station: labeled boxes, recorded detector
//! output, frame annotation and confusion-matrix rendering.

pub mod bbox;
pub mod detection;
pub mod utils;

// Re-export commonly used types
pub use bbox::{BBox, BBoxCollection, BBoxStats};
pub use detection::{DetectionConfig, Frame, ReplayDetector};
pub use utils::{HeatmapRenderer, ImageUtils};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the detection side
pub mod traits {
    use super::*;

    /// Source of per-frame detector output.
    pub trait Detector {
        /// Next frame to snapshot, or `None` once the operator quits or the source runs dry.
        fn next_frame(&mut self) -> Result<Option<Frame>>;
    }
}
