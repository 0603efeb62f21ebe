//! Domain layer for triple-check
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Consensus Round
//!
//! A single captured question is fanned out to every registered answer
//! provider. Each provider fills exactly one slot of the [`ConsensusRound`];
//! once every slot is filled the round is closed and an
//! [`AgreementVerdict`] is computed.
//!
//! ## Canonical Answers
//!
//! Providers answer in free text ("**B**", "The answer is quarterly.",
//! "four times a year"). [`normalize`] maps each answer to a canonical token
//! so that equality of canonical forms is the sole agreement criterion.

pub mod answer;
pub mod config;
pub mod consensus;
pub mod core;
pub mod prompt;

// Re-export commonly used types
pub use answer::{extract_short_answer_line, normalize};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AgreementVerdict, AnswerClass, ConsensusRound, ProviderResult, ProviderSlot, RoundError,
    SlotStatus,
};
pub use core::{error::DomainError, provider::ProviderId, question::Question};
pub use prompt::AnswerPromptTemplate;
