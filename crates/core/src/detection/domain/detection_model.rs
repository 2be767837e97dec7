use ndarray::ArrayView4;
use thiserror::Error;

/// One image's worth of model output, already in host memory.
///
/// The three sequences are parallel: index `i` is one candidate instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawDetections {
    /// `[x1, y1, x2, y2]` per instance, in input-image pixel coordinates.
    pub boxes: Vec<[f32; 4]>,
    pub labels: Vec<i64>,
    pub scores: Vec<f32>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("inference failed: {0}")]
    Inference(Box<dyn std::error::Error + Send + Sync>),
    #[error("unexpected model output: {0}")]
    Output(String),
}

/// A loaded detection model bound to a device and weights.
///
/// Given a batched NCHW float tensor, returns one [`RawDetections`] per
/// image in the batch. Implementations run in inference mode and hand back
/// host-memory results; how they talk to the compute device is their own
/// business.
pub trait DetectionModel: Send {
    fn forward(&mut self, input: ArrayView4<'_, f32>) -> Result<Vec<RawDetections>, ModelError>;
}
