//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::ProviderId`]: stable identifier of a registered answer provider
//! - [`question::Question`]: a validated question extracted from a capture
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod provider;
pub mod question;
pub mod string;
