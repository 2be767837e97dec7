use ndarray::Array4;

use crate::shared::frame::Frame;

/// Convert a decoded RGB frame into the batched NCHW float tensor detection
/// models expect: shape `[1, 3, H, W]`, values scaled to `[0, 1]`.
///
/// Spatial resizing is left to the model; the detection architectures in the
/// registry accept variable input resolutions.
pub fn image_to_tensor(frame: &Frame) -> Array4<f32> {
    debug_assert_eq!(frame.channels(), 3, "expected an RGB frame");

    let h = frame.height() as usize;
    let w = frame.width() as usize;
    let src = frame.as_ndarray(); // [H, W, C] u8

    let mut tensor = Array4::<f32>::zeros((1, 3, h, w));
    for y in 0..h {
        for x in 0..w {
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[y, x, c]] as f32 / 255.0;
            }
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tensor_shape_is_batched_nchw() {
        let frame = Frame::new(vec![0u8; 20 * 10 * 3], 20, 10, 3);
        let tensor = image_to_tensor(&frame);
        assert_eq!(tensor.shape(), &[1, 3, 10, 20]);
    }

    #[test]
    fn test_values_scaled_to_unit_range() {
        let frame = Frame::new(vec![255u8; 4 * 4 * 3], 4, 4, 3);
        let tensor = image_to_tensor(&frame);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 2, 3, 3]], 1.0);
    }

    #[test]
    fn test_channels_transposed_to_planes() {
        // Single pixel with distinct channel values
        let frame = Frame::new(vec![255, 128, 0], 1, 1, 3);
        let tensor = image_to_tensor(&frame);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 1, 0, 0]], 128.0 / 255.0);
        assert_relative_eq!(tensor[[0, 2, 0, 0]], 0.0);
    }

    #[test]
    fn test_pixel_position_preserved() {
        // 2x2 black frame with a white pixel at (row=1, col=0)
        let mut data = vec![0u8; 12];
        for c in 0..3 {
            data[6 + c] = 255;
        }
        let frame = Frame::new(data, 2, 2, 3);
        let tensor = image_to_tensor(&frame);
        assert_relative_eq!(tensor[[0, 0, 1, 0]], 1.0);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert_relative_eq!(tensor[[0, 0, 1, 1]], 0.0);
    }
}
