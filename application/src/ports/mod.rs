//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod answer_backend;
pub mod answer_provider;
pub mod progress;
pub mod text_extractor;
