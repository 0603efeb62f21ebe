//! Provider identifier value object

use serde::{Deserialize, Serialize};

/// Identifier of a registered answer provider (Value Object)
///
/// Provider ids are short, config-level names such as `"gpt4"` or
/// `"sonar_pro"`. They key the slots of a consensus round.
///
/// # Example
///
/// ```
/// use triplecheck_domain::ProviderId;
///
/// let id = ProviderId::new("sonar_pro");
/// assert_eq!(id.as_str(), "sonar_pro");
/// assert_eq!(id.to_string(), "sonar_pro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
