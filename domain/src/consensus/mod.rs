//! Consensus round domain
//!
//! A round fans one question out to a fixed, ordered set of providers and
//! collects exactly one [`ProviderResult`] per provider.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ConsensusRound                                               │
//! ├──────────────────────────────────────────────────────────────┤
//! │  question ──► [gpt4: pending] [sonar_pro: pending] [sonar: …] │
//! │                    │                 │                │       │
//! │                 record()          record()         record()   │
//! │                    ▼                 ▼                ▼       │
//! │               all slots filled ──► normalize ──► verdict      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod result;
pub mod round;
pub mod verdict;

pub use result::ProviderResult;
pub use round::{ConsensusRound, ProviderSlot, RoundError, SlotStatus};
pub use verdict::{AgreementVerdict, AnswerClass};
