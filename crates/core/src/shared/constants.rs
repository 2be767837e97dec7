/// Minimum score (exclusive) a detection must exceed to be kept.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.9;

/// Published pretrained detection weights: `(name, file, url)`.
///
/// Names are the identifiers accepted as a weights source; files land in
/// the local weights cache on first use.
pub const PRETRAINED_WEIGHTS: &[(&str, &str, &str)] = &[
    (
        "openlogo-faster-rcnn",
        "fasterrcnn_resnet50_fpn_openlogo.onnx",
        "https://github.com/logoscout/logoscout/releases/download/v0.1.0/fasterrcnn_resnet50_fpn_openlogo.onnx",
    ),
    (
        "openlogo-retinanet",
        "retinanet_resnet50_fpn_openlogo.onnx",
        "https://github.com/logoscout/logoscout/releases/download/v0.1.0/retinanet_resnet50_fpn_openlogo.onnx",
    ),
    (
        "openlogo-ssd",
        "ssd300_vgg16_openlogo.onnx",
        "https://github.com/logoscout/logoscout/releases/download/v0.1.0/ssd300_vgg16_openlogo.onnx",
    ),
];

/// Default published weights per registry algorithm.
pub const DEFAULT_WEIGHTS: &[(&str, &str)] = &[
    ("faster_rcnn", "openlogo-faster-rcnn"),
    ("retinanet", "openlogo-retinanet"),
    ("ssd", "openlogo-ssd"),
];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
