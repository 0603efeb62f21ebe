//! Application layer for triple-check
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    answer_backend::{AnswerBackend, BackendError},
    answer_provider::{AnswerProvider, TimedProvider},
    progress::{NoProgress, ProgressNotifier},
    text_extractor::TextExtractor,
};
pub use use_cases::run_consensus::{ConsensusOrchestrator, RoundHandle};
