//! OCR adapters

mod google_vision;

pub use google_vision::GoogleVisionOcr;
