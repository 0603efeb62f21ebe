//! Answer provider port
//!
//! The uniform contract every backend is wrapped behind: question text in,
//! timed result out. Providers never fail; a failed call is reported as a
//! [`ProviderResult`] whose text describes the failure.

use super::answer_backend::AnswerBackend;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, warn};
use triplecheck_domain::{ProviderId, ProviderResult, extract_short_answer_line};

/// A named answer source taking part in consensus rounds
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Stable identifier, unique among registered providers
    fn id(&self) -> &ProviderId;

    /// Human-readable name used in output and failure messages
    fn label(&self) -> &str;

    /// Answer a question. Must not panic on backend failure.
    async fn answer(&self, question: &str) -> ProviderResult;
}

/// Provider built from any [`AnswerBackend`]
///
/// Times the backend call alone: the clock starts right before dispatch and
/// stops as soon as the raw response (or error) is available. Short-line
/// cleanup runs after the clock stops.
pub struct TimedProvider<B> {
    id: ProviderId,
    label: String,
    backend: B,
}

impl<B: AnswerBackend> TimedProvider<B> {
    pub fn new(id: impl Into<ProviderId>, label: impl Into<String>, backend: B) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: AnswerBackend> AnswerProvider for TimedProvider<B> {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn answer(&self, question: &str) -> ProviderResult {
        let start = Instant::now();
        let outcome = self.backend.request(question).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(text) => {
                debug!(provider = %self.id, elapsed_ms = elapsed.as_millis() as u64, "Backend answered");
                let text = if self.backend.cleans_short_answer() {
                    extract_short_answer_line(&text).to_string()
                } else {
                    text
                };
                ProviderResult::answered(text, elapsed)
            }
            Err(e) => {
                warn!("Provider {} failed: {}", self.id, e);
                ProviderResult::failed(
                    format!("Failed to process with {}: {}", self.label, e),
                    elapsed,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::answer_backend::BackendError;
    use std::time::Duration;

    struct FixedBackend {
        reply: Result<&'static str, u16>,
        cleanup: bool,
    }

    #[async_trait]
    impl AnswerBackend for FixedBackend {
        async fn request(&self, _question: &str) -> Result<String, BackendError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(BackendError::Status {
                    status,
                    body: "upstream unavailable".to_string(),
                }),
            }
        }

        fn cleans_short_answer(&self) -> bool {
            self.cleanup
        }
    }

    #[tokio::test]
    async fn test_successful_answer_is_timed() {
        let provider = TimedProvider::new(
            "gpt4",
            "GPT-4",
            FixedBackend {
                reply: Ok("B"),
                cleanup: false,
            },
        );

        let result = provider.answer("Which one?").await;
        assert!(result.success);
        assert_eq!(result.text, "B");
        assert!(result.elapsed >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_failure_becomes_result_text() {
        let provider = TimedProvider::new(
            "sonar",
            "Sonar",
            FixedBackend {
                reply: Err(503),
                cleanup: false,
            },
        );

        let result = provider.answer("Which one?").await;
        assert!(!result.success);
        assert_eq!(
            result.text,
            "Failed to process with Sonar: HTTP 503: upstream unavailable"
        );
        assert!(result.elapsed >= Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_cleanup_applies_only_when_backend_asks() {
        let raw = "Looking at the choices carefully\nB\nbecause of the rate";

        let cleaned = TimedProvider::new(
            "gemini",
            "Gemini",
            FixedBackend {
                reply: Ok(raw),
                cleanup: true,
            },
        )
        .answer("q")
        .await;
        assert_eq!(cleaned.text, "B");

        let untouched = TimedProvider::new(
            "gpt4",
            "GPT-4",
            FixedBackend {
                reply: Ok(raw),
                cleanup: false,
            },
        )
        .answer("q")
        .await;
        assert_eq!(untouched.text, raw);
    }
}
