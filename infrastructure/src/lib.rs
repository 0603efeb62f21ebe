//! Infrastructure layer for triple-check
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP answer backends, the OCR client and
//! configuration file loading.

pub mod backends;
pub mod config;
pub mod ocr;

// Re-export commonly used types
pub use backends::{ChatCompletionsBackend, GeminiBackend, ProviderSetupError, build_providers};
pub use config::{
    ConfigLoader, FileBehaviorConfig, FileConfig, FileOcrConfig, FileOutputConfig,
    FileProviderConfig, ProviderKind,
};
pub use ocr::GoogleVisionOcr;
