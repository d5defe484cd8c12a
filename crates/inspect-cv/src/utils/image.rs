//! Frame loading, annotation and saving

use crate::bbox::BBoxCollection;
use crate::Result;
use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::fs;
use std::path::Path;

/// Height of the verdict banner drawn above each box
const BANNER_HEIGHT: u32 = 8;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_rgb8())
    }

    /// Save, creating the parent directory if needed
    pub fn save_rgb<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        image
            .save(path)
            .with_context(|| format!("Failed to save image: {:?}", path))
    }

    /// Outline every detection in its verdict colour, with a filled banner on top.
    pub fn annotate(image: &mut RgbImage, detections: &BBoxCollection, thickness: u32) {
        for bbox in detections {
            let color = bbox.verdict_color();
            for inset in 0..thickness.max(1) as i32 {
                let width = bbox.width - 2 * inset;
                let height = bbox.height - 2 * inset;
                if width <= 0 || height <= 0 {
                    break;
                }
                let rect = Rect::at(bbox.x + inset, bbox.y + inset).of_size(width as u32, height as u32);
                draw_hollow_rect_mut(image, rect, color);
            }

            let banner = Rect::at(bbox.x, bbox.y - BANNER_HEIGHT as i32)
                .of_size(bbox.width.max(1) as u32, BANNER_HEIGHT);
            draw_filled_rect_mut(image, banner, color);
        }
    }

    /// Load `source`, annotate it and write the result to `output`.
    pub fn annotate_file<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        detections: &BBoxCollection,
        thickness: u32,
        output: Q,
    ) -> Result<()> {
        let mut image = Self::load_rgb(source)?;
        Self::annotate(&mut image, detections, thickness);
        Self::save_rgb(&image, &output)?;
        log::info!("Annotated frame saved: {:?}", output.as_ref());
        Ok(())
    }

    pub fn pixel(image: &RgbImage, x: u32, y: u32) -> Option<Rgb<u8>> {
        (x < image.width() && y < image.height()).then(|| *image.get_pixel(x, y))
    }
}
