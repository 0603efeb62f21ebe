//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for round results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every provider's answer, canonical form and timing, then the verdict
    #[default]
    Full,
    /// Only the verdict and the agreed answer
    Verdict,
    /// The serialized round
    Json,
}
