use thiserror::Error;

use crate::shared::frame::Frame;

use super::detection_model::{DetectionModel, ModelError};
use super::detection_set::DetectionSet;
use super::preprocess::image_to_tensor;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Inference(#[from] ModelError),
    #[error("model returned no per-image detections")]
    NoOutput,
}

/// Wraps a loaded detection model and a confidence threshold.
///
/// Each `predict` call is independent: the image goes through tensor
/// conversion, one forward pass, and confidence filtering, and nothing is
/// retained between calls. The model handle is fixed at construction; use
/// the registry to build one from an algorithm name.
pub struct Detector {
    model: Box<dyn DetectionModel>,
    min_confidence: f32,
}

impl Detector {
    pub fn new(model: Box<dyn DetectionModel>, min_confidence: f32) -> Self {
        Self {
            model,
            min_confidence,
        }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Detect instances in `frame`, keeping those scoring strictly above the
    /// configured threshold.
    ///
    /// The model may batch internally; only the first per-image record is
    /// used. An empty result is valid, not an error.
    pub fn predict(&mut self, frame: &Frame) -> Result<DetectionSet, PredictError> {
        let input = image_to_tensor(frame);
        let mut batches = self.model.forward(input.view())?;
        if batches.is_empty() {
            return Err(PredictError::NoOutput);
        }
        let raw = batches.swap_remove(0);
        Ok(DetectionSet::from_raw(raw).filter_by_confidence(self.min_confidence))
    }
}
