//! Bounding box operations and non-maximum suppression
//!
//! Core abstraction for representing detector output.

use image::Rgb;
use inspect_core::taxonomy::{DetectionState, ParsedLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const OK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const NOT_OK_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

fn default_confidence() -> f64 {
    1.0
}

/// A labeled detection box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    pub label: String,
}

impl BBox {
    /// Create a new, unlabeled bounding box
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
            label: String::new(),
        }
    }

    /// Set the detector class label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Inspection state encoded in the label
    pub fn state(&self) -> DetectionState {
        ParsedLabel::parse(&self.label).state
    }

    /// Box colour for annotation: green for OK, red for NOT OK
    pub fn verdict_color(&self) -> Rgb<u8> {
        if self.state().is_conforming() {
            OK_COLOR
        } else {
            NOT_OK_COLOR
        }
    }

    /// Calculate area of the bounding box
    pub fn area(&self) -> f64 {
        (self.width.max(0) as f64) * (self.height.max(0) as f64)
    }

    /// Calculate intersection over union (IoU) with another box
    pub fn iou(&self, other: &BBox) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = ((x2 - x1) as f64) * ((y2 - y1) as f64);
        let union = self.area() + other.area() - intersection;

        intersection / union
    }

    /// Check if this box overlaps with another
    pub fn overlaps(&self, other: &BBox, threshold: f64) -> bool {
        self.iou(other) > threshold
    }
}

/// All detections of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BBoxCollection {
    boxes: Vec<BBox>,
}

impl BBoxCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(boxes: Vec<BBox>) -> Self {
        Self { boxes }
    }

    pub fn push(&mut self, bbox: BBox) {
        self.boxes.push(bbox);
    }

    pub fn as_slice(&self) -> &[BBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Labels in detection order, as consumed by the reconciler
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.boxes.iter().map(|bbox| bbox.label.as_str())
    }

    /// Sort by confidence (descending)
    pub fn sort_by_confidence(&mut self) {
        self.boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    }

    /// Filter by confidence threshold
    pub fn filter_by_confidence(mut self, threshold: f64) -> Self {
        self.boxes.retain(|bbox| bbox.confidence >= threshold);
        self
    }

    /// Apply non-maximum suppression
    pub fn apply_nms(mut self, threshold: f64) -> Self {
        if self.boxes.is_empty() {
            return self;
        }

        self.sort_by_confidence();

        let mut keep = Vec::new();
        let mut suppressed = vec![false; self.boxes.len()];

        for i in 0..self.boxes.len() {
            if suppressed[i] {
                continue;
            }

            keep.push(self.boxes[i].clone());

            for j in (i + 1)..self.boxes.len() {
                if !suppressed[j] && self.boxes[i].overlaps(&self.boxes[j], threshold) {
                    suppressed[j] = true;
                }
            }
        }

        Self::from_vec(keep)
    }

    /// Apply NMS within each label separately; output is grouped by label.
    pub fn apply_class_nms(self, threshold: f64) -> Self {
        let mut groups: BTreeMap<String, Vec<BBox>> = BTreeMap::new();
        for bbox in self.boxes {
            groups.entry(bbox.label.clone()).or_default().push(bbox);
        }

        let mut result = Vec::new();
        for (_, boxes) in groups {
            result.extend(BBoxCollection::from_vec(boxes).apply_nms(threshold).boxes);
        }

        Self::from_vec(result)
    }

    /// OK / NOT OK split of the frame, by label suffix
    pub fn stats(&self) -> BBoxStats {
        let ok_boxes = self
            .boxes
            .iter()
            .filter(|bbox| bbox.state().is_conforming())
            .count();
        let min_confidence = self
            .boxes
            .iter()
            .map(|bbox| bbox.confidence)
            .reduce(f64::min)
            .unwrap_or(0.0);

        BBoxStats {
            total_boxes: self.boxes.len(),
            ok_boxes,
            not_ok_boxes: self.boxes.len() - ok_boxes,
            min_confidence,
        }
    }
}

impl<'a> IntoIterator for &'a BBoxCollection {
    type Item = &'a BBox;
    type IntoIter = std::slice::Iter<'a, BBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

impl FromIterator<BBox> for BBoxCollection {
    fn from_iter<T: IntoIterator<Item = BBox>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Per-frame verdict counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBoxStats {
    pub total_boxes: usize,
    pub ok_boxes: usize,
    pub not_ok_boxes: usize,
    pub min_confidence: f64,
}
