//! Utility modules

pub mod image;
pub mod plot;

pub use self::image::ImageUtils;
pub use plot::HeatmapRenderer;
