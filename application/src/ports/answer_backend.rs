//! Answer backend port
//!
//! Defines the interface for a single network answer service.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while calling an answer backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A network service that turns a question into raw answer text
///
/// Backends build their own request (prompt preamble, auth, body shape).
/// Errors are returned as-is; [`TimedProvider`](super::answer_provider::TimedProvider)
/// turns them into ordinary results.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Send the question and return the raw answer text
    async fn request(&self, question: &str) -> Result<String, BackendError>;

    /// Whether raw answers should be reduced to a short answer-like line
    fn cleans_short_answer(&self) -> bool {
        false
    }
}
