//! Replay of recorded detector output

use super::config::DetectionConfig;
use crate::bbox::BBoxCollection;
use crate::traits::Detector;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Detector output for one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Source image of the frame, when it was kept
    #[serde(default)]
    pub image: Option<PathBuf>,
    pub detections: BBoxCollection,
}

impl Frame {
    pub fn new(detections: BBoxCollection) -> Self {
        Self {
            image: None,
            detections,
        }
    }
}

/// Recorded frames come either bare (a list of boxes) or with their image path.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordedFrame {
    Bare(BBoxCollection),
    WithImage(Frame),
}

impl From<RecordedFrame> for Frame {
    fn from(recorded: RecordedFrame) -> Self {
        match recorded {
            RecordedFrame::Bare(detections) => Frame::new(detections),
            RecordedFrame::WithImage(frame) => frame,
        }
    }
}

/// Plays back frames captured from a detector run, in order.
pub struct ReplayDetector {
    config: DetectionConfig,
    frames: VecDeque<Frame>,
}

impl ReplayDetector {
    /// Load the frames named by `config.frames_file`
    pub fn new(config: DetectionConfig) -> Result<Self> {
        let frames = Self::load_frames(&config.frames_file)?;
        Ok(Self::from_frames(config, frames))
    }

    pub fn from_frames(config: DetectionConfig, frames: Vec<Frame>) -> Self {
        Self {
            config,
            frames: frames.into(),
        }
    }

    pub fn load_frames(path: &Path) -> Result<Vec<Frame>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read detector frames: {:?}", path))?;
        let recorded: Vec<RecordedFrame> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse detector frames: {:?}", path))?;

        log::info!("Loaded {} recorded frames from {:?}", recorded.len(), path);
        Ok(recorded.into_iter().map(Frame::from).collect())
    }

    /// Confidence filtering and optional class-aware NMS
    fn postprocess(&self, detections: BBoxCollection) -> BBoxCollection {
        let raw = detections.len();
        let mut detections = detections.filter_by_confidence(self.config.confidence_threshold);
        if let Some(threshold) = self.config.nms_threshold {
            detections = detections.apply_class_nms(threshold);
        }
        let stats = detections.stats();
        log::debug!(
            "Kept {} of {} detections: {} OK, {} NOT OK (min confidence {:.2})",
            stats.total_boxes,
            raw,
            stats.ok_boxes,
            stats.not_ok_boxes,
            stats.min_confidence
        );
        detections
    }
}

impl Detector for ReplayDetector {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        Ok(Some(Frame {
            detections: self.postprocess(frame.detections),
            ..frame
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    #[test]
    fn test_replay_filters_low_confidence() -> Result<()> {
        let frame = Frame::new(BBoxCollection::from_vec(vec![
            BBox::new(0, 0, 10, 10, 0.9).with_label("fuse"),
            BBox::new(20, 0, 10, 10, 0.1).with_label("fuse_w"),
        ]));
        let mut detector = ReplayDetector::from_frames(DetectionConfig::default(), vec![frame]);

        let frame = detector.next_frame()?.expect("one frame");
        assert_eq!(frame.detections.labels().collect::<Vec<_>>(), vec!["fuse"]);
        assert!(detector.next_frame()?.is_none());
        Ok(())
    }

    #[test]
    fn test_replay_applies_class_nms() -> Result<()> {
        let frame = Frame::new(BBoxCollection::from_vec(vec![
            BBox::new(0, 0, 10, 10, 0.9).with_label("MOV"),
            BBox::new(1, 0, 10, 10, 0.8).with_label("MOV"),
        ]));
        let config = DetectionConfig::with_class_nms("unused.json", 0.5);
        let mut detector = ReplayDetector::from_frames(config, vec![frame]);

        assert_eq!(detector.next_frame()?.expect("one frame").detections.len(), 1);
        Ok(())
    }

    #[test]
    fn test_load_mixed_frame_shapes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("frames.json");
        fs::write(
            &path,
            r#"[
                [{"x": 0, "y": 0, "width": 5, "height": 5, "confidence": 0.8, "label": "fuse"}],
                {"image": "board.png", "detections": []}
            ]"#,
        )?;

        let frames = ReplayDetector::load_frames(&path)?;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].image, None);
        assert_eq!(frames[0].detections.len(), 1);
        assert_eq!(frames[1].image, Some(PathBuf::from("board.png")));
        Ok(())
    }
}
