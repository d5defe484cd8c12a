//! Confusion matrix heatmap rendering
//!
//! Rows are the actual axis (OK (Expected), NOT OK (Expected)), columns the predicted
//! axis (OK, NOT OK), in the cell order of [`ConfusionMatrix::as_rows`]. Cell shade is
//! proportional to the count, with a colour scale strip on the right. Numeric
//! annotations are printed alongside by the matrix's text rendering.

use super::image::ImageUtils;
use crate::Result;
use anyhow::ensure;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use inspect_core::ConfusionMatrix;
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([64, 64, 64]);

/// Sequential orange colour scale, light to dark.
const ORANGES: [(f64, [u8; 3]); 5] = [
    (0.0, [255, 245, 235]),
    (0.25, [253, 208, 162]),
    (0.5, [253, 141, 60]),
    (0.75, [217, 72, 1]),
    (1.0, [127, 39, 4]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapRenderer {
    pub cell_size: u32,
    pub margin: u32,
    pub bar_width: u32,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self {
            cell_size: 160,
            margin: 20,
            bar_width: 24,
        }
    }
}

impl HeatmapRenderer {
    pub fn dimensions(&self) -> (u32, u32) {
        let grid = 2 * self.cell_size;
        (3 * self.margin + grid + self.bar_width, 2 * self.margin + grid)
    }

    /// Top-left corner of the cell at (row, col)
    pub fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        (
            self.margin + col as u32 * self.cell_size,
            self.margin + row as u32 * self.cell_size,
        )
    }

    pub fn render(&self, matrix: &ConfusionMatrix) -> RgbImage {
        let (width, height) = self.dimensions();
        let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
        let max = matrix.max_cell();

        for (row, values) in matrix.as_rows().iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let (x, y) = self.cell_origin(row, col);
                let rect = Rect::at(x as i32, y as i32).of_size(self.cell_size, self.cell_size);
                let intensity = if max == 0 { 0.0 } else { value as f64 / max as f64 };
                draw_filled_rect_mut(&mut image, rect, oranges(intensity));
                draw_hollow_rect_mut(&mut image, rect, GRID);
            }
        }

        let bar_x = 2 * self.margin + 2 * self.cell_size;
        let bar_height = 2 * self.cell_size;
        for offset in 0..bar_height {
            let intensity = 1.0 - offset as f64 / (bar_height - 1).max(1) as f64;
            let row = Rect::at(bar_x as i32, (self.margin + offset) as i32).of_size(self.bar_width, 1);
            draw_filled_rect_mut(&mut image, row, oranges(intensity));
        }
        draw_hollow_rect_mut(
            &mut image,
            Rect::at(bar_x as i32, self.margin as i32).of_size(self.bar_width, bar_height),
            GRID,
        );

        image
    }

    /// Render `matrix` and write it to `path`. A zero cell or bar size is an error.
    pub fn save<P: AsRef<Path>>(&self, matrix: &ConfusionMatrix, path: P) -> Result<()> {
        ensure!(
            self.cell_size > 0 && self.bar_width > 0,
            "Heatmap cell size and bar width must be non-zero"
        );
        ImageUtils::save_rgb(&self.render(matrix), &path)?;
        log::info!("Confusion matrix heatmap saved: {:?}", path.as_ref());
        Ok(())
    }
}

/// Colour for `intensity` in [0, 1]; values outside are clamped.
pub fn oranges(intensity: f64) -> Rgb<u8> {
    let t = intensity.clamp(0.0, 1.0);
    for pair in ORANGES.windows(2) {
        let (start, low) = pair[0];
        let (end, high) = pair[1];
        if t <= end {
            let local = (t - start) / (end - start);
            let channel = |i: usize| {
                (low[i] as f64 + (high[i] as f64 - low[i] as f64) * local).round() as u8
            };
            return Rgb([channel(0), channel(1), channel(2)]);
        }
    }
    Rgb(ORANGES[ORANGES.len() - 1].1)
}
