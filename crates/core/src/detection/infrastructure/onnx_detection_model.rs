/// Detection model backed by an ONNX Runtime session.
///
/// Covers the exported torchvision-style detection family: three tensor
/// outputs carrying per-instance boxes, class labels, and scores for one
/// image. Architectures differ only in output ordering, captured by
/// [`OutputLayout`].
use std::path::{Path, PathBuf};

use ndarray::ArrayView4;
use thiserror::Error;

use crate::detection::domain::detection_model::{DetectionModel, ModelError, RawDetections};

use super::device::{Device, DeviceError};

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("weights file not found: {0}")]
    WeightsNotFound(PathBuf),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("failed to load detection model: {0}")]
    Session(#[from] ort::Error),
}

/// Which session output index carries which tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputLayout {
    /// boxes, labels, scores (Faster R-CNN export order)
    BoxesLabelsScores,
    /// boxes, scores, labels (RetinaNet / SSD export order)
    BoxesScoresLabels,
}

impl OutputLayout {
    fn boxes_index(&self) -> usize {
        0
    }

    fn labels_index(&self) -> usize {
        match self {
            OutputLayout::BoxesLabelsScores => 1,
            OutputLayout::BoxesScoresLabels => 2,
        }
    }

    fn scores_index(&self) -> usize {
        match self {
            OutputLayout::BoxesLabelsScores => 2,
            OutputLayout::BoxesScoresLabels => 1,
        }
    }
}

pub struct OnnxDetectionModel {
    session: ort::session::Session,
    layout: OutputLayout,
}

impl OnnxDetectionModel {
    /// Build an inference session for `weights` pinned to `device`.
    pub fn load(
        weights: &Path,
        device: &Device,
        layout: OutputLayout,
    ) -> Result<Self, ModelLoadError> {
        if !weights.exists() {
            return Err(ModelLoadError::WeightsNotFound(weights.to_path_buf()));
        }
        let providers = device.execution_providers()?;
        log::debug!(
            "Loading detection model from {} on {device}",
            weights.display()
        );
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(providers)?
            .commit_from_file(weights)?;
        Ok(Self { session, layout })
    }
}

impl DetectionModel for OnnxDetectionModel {
    fn forward(&mut self, input: ArrayView4<'_, f32>) -> Result<Vec<RawDetections>, ModelError> {
        let input_value = ort::value::Tensor::from_array(input.to_owned())
            .map_err(|e| ModelError::Inference(Box::new(e)))?;
        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|e| ModelError::Inference(Box::new(e)))?;

        if outputs.len() < 3 {
            return Err(ModelError::Output(format!(
                "expected 3 outputs (boxes, labels, scores), got {}",
                outputs.len()
            )));
        }

        let boxes_tensor = outputs[self.layout.boxes_index()]
            .try_extract_array::<f32>()
            .map_err(|e| ModelError::Inference(Box::new(e)))?;
        let boxes_data = boxes_tensor
            .as_slice()
            .ok_or_else(|| ModelError::Output("boxes output is not contiguous".into()))?;
        if boxes_data.len() % 4 != 0 {
            return Err(ModelError::Output(format!(
                "boxes output length {} is not a multiple of 4",
                boxes_data.len()
            )));
        }
        let boxes: Vec<[f32; 4]> = boxes_data
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        let labels_tensor = outputs[self.layout.labels_index()]
            .try_extract_array::<i64>()
            .map_err(|e| ModelError::Inference(Box::new(e)))?;
        let labels: Vec<i64> = labels_tensor.iter().copied().collect();

        let scores_tensor = outputs[self.layout.scores_index()]
            .try_extract_array::<f32>()
            .map_err(|e| ModelError::Inference(Box::new(e)))?;
        let scores: Vec<f32> = scores_tensor.iter().copied().collect();

        if labels.len() != boxes.len() || scores.len() != boxes.len() {
            return Err(ModelError::Output(format!(
                "instance counts disagree: {} boxes, {} labels, {} scores",
                boxes.len(),
                labels.len(),
                scores.len()
            )));
        }

        Ok(vec![RawDetections {
            boxes,
            labels,
            scores,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_faster_rcnn_order() {
        let layout = OutputLayout::BoxesLabelsScores;
        assert_eq!(layout.boxes_index(), 0);
        assert_eq!(layout.labels_index(), 1);
        assert_eq!(layout.scores_index(), 2);
    }

    #[test]
    fn test_layout_retinanet_order() {
        let layout = OutputLayout::BoxesScoresLabels;
        assert_eq!(layout.boxes_index(), 0);
        assert_eq!(layout.scores_index(), 1);
        assert_eq!(layout.labels_index(), 2);
    }

    #[test]
    fn test_load_missing_weights_fails_without_session() {
        let err = OnnxDetectionModel::load(
            Path::new("/nonexistent/weights.onnx"),
            &Device::Cpu,
            OutputLayout::BoxesLabelsScores,
        )
        .unwrap_err();
        assert!(matches!(err, ModelLoadError::WeightsNotFound(_)));
    }
}
