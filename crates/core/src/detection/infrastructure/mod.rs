pub mod device;
pub mod model_resolver;
pub mod onnx_detection_model;
pub mod registry;
