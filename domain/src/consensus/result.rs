//! Timed provider result value object

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one provider invocation for one question
///
/// Failures are data: a provider that could not answer still produces a
/// result whose `text` describes the failure. `elapsed` covers only the
/// network round trip.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use triplecheck_domain::ProviderResult;
///
/// let ok = ProviderResult::answered("B", Duration::from_millis(850));
/// assert!(ok.success);
///
/// let failed = ProviderResult::failed("Failed to process with sonar: HTTP 500", Duration::ZERO);
/// assert!(!failed.success);
/// assert!(!failed.text.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Raw answer text, or a human-readable failure message
    pub text: String,
    /// Wall-clock time of the backend call
    #[serde(rename = "elapsed_secs", with = "duration_secs")]
    pub elapsed: Duration,
    /// Whether the backend produced an answer
    pub success: bool,
}

impl ProviderResult {
    /// Create a result carrying an answer from the backend
    pub fn answered(text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            text: text.into(),
            elapsed,
            success: true,
        }
    }

    /// Create a result describing a failed backend call
    pub fn failed(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            text: message.into(),
            elapsed,
            success: false,
        }
    }

    /// Elapsed time in fractional seconds (for display)
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::try_from_secs_f64(secs).unwrap_or_default())
    }
}
