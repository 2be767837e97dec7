use std::path::Path;

use thiserror::Error;

use crate::detection::domain::detection_model::DetectionModel;
use crate::detection::domain::detector::Detector;

use super::device::Device;
use super::model_resolver::{self, ProgressFn, ResolveError, WeightsSource};
use super::onnx_detection_model::{ModelLoadError, OnnxDetectionModel, OutputLayout};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown detection algorithm '{name}', available: {}", .available.join(", "))]
    UnknownAlgorithm {
        name: String,
        available: Vec<&'static str>,
    },
    #[error("algorithm '{name}' has no published default weights, pass a weights source")]
    NoDefaultWeights { name: String },
    #[error(transparent)]
    Weights(#[from] ResolveError),
    #[error(transparent)]
    Load(#[from] ModelLoadError),
}

/// Constructor capability stored in the registry.
type Constructor = fn(&Device, &Path) -> Result<Box<dyn DetectionModel>, ModelLoadError>;

/// Fixed algorithm-name → constructor table.
const REGISTRY: &[(&str, Constructor)] = &[
    ("faster_rcnn", faster_rcnn),
    ("retinanet", retinanet),
    ("ssd", ssd),
];

fn faster_rcnn(device: &Device, weights: &Path) -> Result<Box<dyn DetectionModel>, ModelLoadError> {
    Ok(Box::new(OnnxDetectionModel::load(
        weights,
        device,
        OutputLayout::BoxesLabelsScores,
    )?))
}

fn retinanet(device: &Device, weights: &Path) -> Result<Box<dyn DetectionModel>, ModelLoadError> {
    Ok(Box::new(OnnxDetectionModel::load(
        weights,
        device,
        OutputLayout::BoxesScoresLabels,
    )?))
}

fn ssd(device: &Device, weights: &Path) -> Result<Box<dyn DetectionModel>, ModelLoadError> {
    Ok(Box::new(OnnxDetectionModel::load(
        weights,
        device,
        OutputLayout::BoxesScoresLabels,
    )?))
}

pub fn available_algorithms() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

fn lookup(algorithm: &str) -> Result<Constructor, BuildError> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == algorithm)
        .map(|(_, ctor)| *ctor)
        .ok_or_else(|| BuildError::UnknownAlgorithm {
            name: algorithm.to_string(),
            available: available_algorithms(),
        })
}

/// Instantiate the named algorithm's model on `device` from a weights file.
pub fn create_model(
    algorithm: &str,
    device: &Device,
    weights: &Path,
) -> Result<Box<dyn DetectionModel>, BuildError> {
    let ctor = lookup(algorithm)?;
    Ok(ctor(device, weights)?)
}

/// Build a ready-to-use [`Detector`]: registry lookup, weights resolution,
/// model construction, threshold attached.
///
/// Without an explicit `weights` source the algorithm's published default
/// weights are used. The registry lookup happens first, so an unknown name
/// fails before any weights are touched.
pub fn build_detector(
    algorithm: &str,
    device: &Device,
    weights: Option<WeightsSource>,
    min_confidence: f32,
    progress: Option<ProgressFn>,
) -> Result<Detector, BuildError> {
    let ctor = lookup(algorithm)?;

    let source = match weights {
        Some(source) => source,
        None => {
            WeightsSource::default_for(algorithm).ok_or_else(|| BuildError::NoDefaultWeights {
                name: algorithm.to_string(),
            })?
        }
    };
    let weights_path = model_resolver::resolve_source(&source, progress)?;

    log::info!(
        "Using {algorithm} on {device} with weights at {}",
        weights_path.display()
    );
    let model = ctor(device, &weights_path)?;
    Ok(Detector::new(model, min_confidence))
}
