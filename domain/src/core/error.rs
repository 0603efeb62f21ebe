//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No answer providers configured")]
    NoProviders,

    #[error("Provider registered twice: {0}")]
    DuplicateProvider(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::NoProviders.to_string(),
            "No answer providers configured"
        );
        assert_eq!(
            DomainError::DuplicateProvider("gpt4".to_string()).to_string(),
            "Provider registered twice: gpt4"
        );
    }
}
