use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::detection::domain::detection_set::DetectionSet;
use crate::detection::domain::detector::{Detector, PredictError};
use crate::imaging::domain::image_reader::{ImageReader, ReadError};

#[derive(Debug, Error)]
pub enum DetectImageError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// One image's detection results, ready for serialization.
///
/// `detections.brands` is empty here; brand assignment is a later stage.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub elapsed_ms: f64,
    pub detections: DetectionSet,
}

/// Read an image file, run the detector once, package the result.
pub struct DetectImageUseCase {
    reader: Box<dyn ImageReader>,
    detector: Detector,
}

impl DetectImageUseCase {
    pub fn new(reader: Box<dyn ImageReader>, detector: Detector) -> Self {
        Self { reader, detector }
    }

    pub fn execute(&mut self, input: &Path) -> Result<DetectionReport, DetectImageError> {
        let frame = self.reader.read(input)?;

        let started = Instant::now();
        let detections = self.detector.predict(&frame)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        log::debug!(
            "{}: {} detection(s) above threshold in {elapsed_ms:.1}ms",
            input.display(),
            detections.len()
        );

        Ok(DetectionReport {
            source: input.to_path_buf(),
            width: frame.width(),
            height: frame.height(),
            elapsed_ms,
            detections,
        })
    }
}
