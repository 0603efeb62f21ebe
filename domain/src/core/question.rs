//! Question value object

use serde::{Deserialize, Serialize};

/// A question to be answered by every registered provider (Value Object)
///
/// Produced from OCR output (or typed directly). An empty or
/// whitespace-only extraction is not a question, so no round is started
/// for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question {
    content: String,
}

impl Question {
    /// Try to create a new question, returning None if the content is blank.
    ///
    /// Surrounding whitespace is trimmed; inner line breaks are kept.
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    /// Create a question from OCR output, treating `None` as a failed extraction
    pub fn from_extraction(extracted: Option<String>) -> Option<Self> {
        extracted.and_then(Self::try_new)
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
