use std::path::Path;

use crate::imaging::domain::image_reader::{ImageReader, ReadError};
use crate::shared::frame::Frame;

/// Decodes image files with the `image` crate, normalizing to 8-bit RGB.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, ReadError> {
        let decoded = image::open(path).map_err(|source| ReadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(rgb.into_raw(), width, height, 3))
    }
}
