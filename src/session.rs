//! Interactive inspection session

use anyhow::{Context, Result};
use inspect_core::{
    now_timestamp, reconcile_at, ConsolePrompt, ExpectationModel, SnapshotRecord, SnapshotStore,
};
use inspect_cv::detection::{Frame, VisualizationConfig};
use inspect_cv::traits::Detector;
use inspect_cv::ImageUtils;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const CONTINUE_PROMPT: &str = "\nType 'ok' to take another snapshot or 'done' to finish: ";

/// Prompt for expectations, snapshot a frame, persist the record; repeat until done.
pub struct InspectionSession<D, S> {
    base_names: Vec<String>,
    totals: BTreeMap<String, i64>,
    detector: D,
    store: S,
    visualization: VisualizationConfig,
    clock: Box<dyn FnMut() -> String>,
}

impl<D: Detector, S: SnapshotStore> InspectionSession<D, S> {
    pub fn new(
        base_names: Vec<String>,
        totals: BTreeMap<String, i64>,
        detector: D,
        store: S,
        visualization: VisualizationConfig,
    ) -> Self {
        Self {
            base_names,
            totals,
            detector,
            store,
            visualization,
            clock: Box::new(now_timestamp),
        }
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: impl FnMut() -> String + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run until the operator answers 'done' or the detector has no more frames.
    /// Returns the number of snapshots saved.
    pub fn run<R: BufRead, W: Write>(&mut self, console: &mut ConsolePrompt<R, W>) -> Result<usize> {
        let mut saved = 0;

        loop {
            writeln!(console.writer(), "Detected elements (excluding '_w' and '_n' suffixes):")?;
            let model = ExpectationModel::build(self.base_names.as_slice(), &self.totals, console)
                .context("Failed to collect expected counts")?;

            let Some(frame) = self.detector.next_frame()? else {
                writeln!(console.writer(), "Exiting program.")?;
                break;
            };

            let (record, path) = self.snapshot(frame, &model)?;
            saved += 1;
            writeln!(console.writer(), "\nLog saved: {}", path.display())?;
            write!(console.writer(), "{}", record.summary())?;

            let reply = console.read_reply(CONTINUE_PROMPT)?;
            match reply.map(|r| r.trim().to_lowercase()).as_deref() {
                Some("done") => {
                    writeln!(console.writer(), "Program ended. Logs saved at:")?;
                    writeln!(console.writer(), "{}", self.store.location().display())?;
                    break;
                }
                Some(_) => continue,
                None => break,
            }
        }

        log::info!("Session finished with {} snapshots", saved);
        Ok(saved)
    }

    fn snapshot(&mut self, frame: Frame, model: &ExpectationModel) -> Result<(SnapshotRecord, PathBuf)> {
        let timestamp = (self.clock)();
        let record = reconcile_at(frame.detections.labels(), model, timestamp);
        let path = self.store.save(&record)?;

        if self.visualization.save_annotated_frames {
            match &frame.image {
                Some(image) => {
                    let output = self
                        .visualization
                        .output_dir
                        .join(format!("{}.png", record.timestamp()));
                    ImageUtils::annotate_file(
                        image,
                        &frame.detections,
                        self.visualization.line_thickness,
                        output,
                    )?;
                }
                None => log::warn!("Frame {} has no image to annotate", record.timestamp()),
            }
        }

        Ok((record, path))
    }
}
