use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Domain interface for loading a decoded image from disk.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, ReadError>;
}
