// Adapters layer: concrete implementations for external systems
// (PDF parsing, language detection, the model hub and the ONNX runtime).

pub mod hub;
pub mod lang;
pub mod onnx;
pub mod pdf;
