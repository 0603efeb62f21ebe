//! Text extraction port
//!
//! OCR collaborator turning a captured image into question text.

use async_trait::async_trait;

/// Extracts question text from an image
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns `None` when no text could be extracted.
    ///
    /// Extraction failures are never errors: callers simply start no round.
    async fn extract_text(&self, image: &[u8]) -> Option<String>;
}
