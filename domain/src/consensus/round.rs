//! Consensus round entity
//!
//! The provider set of a round is fixed at creation. Each slot accepts
//! exactly one result; the round closes itself when the last slot is filled
//! and computes its verdict over the canonical answers.

use super::result::ProviderResult;
use super::verdict::{AgreementVerdict, AnswerClass};
use crate::answer::normalize;
use crate::core::provider::ProviderId;
use crate::core::question::Question;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a result cannot be written to a round
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Provider {provider} is not part of round {round}")]
    UnknownProvider { provider: ProviderId, round: u64 },

    #[error("Provider {provider} already reported in round {round}")]
    AlreadyReported { provider: ProviderId, round: u64 },

    #[error("Round {0} is already complete")]
    Closed(u64),
}

/// Status of a single provider slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Pending,
    Answered,
    Failed,
}

/// One provider's slot in a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSlot {
    /// Provider owning this slot
    pub provider: ProviderId,
    /// Display label (e.g., "Sonar Pro")
    pub label: String,
    /// Result, once the provider has reported
    pub result: Option<ProviderResult>,
}

impl ProviderSlot {
    pub fn status(&self) -> SlotStatus {
        match &self.result {
            None => SlotStatus::Pending,
            Some(r) if r.success => SlotStatus::Answered,
            Some(_) => SlotStatus::Failed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    /// Canonical form of the reported text (derived, never stored)
    pub fn canonical_answer(&self) -> Option<String> {
        self.result.as_ref().map(|r| normalize(&r.text))
    }
}

/// A single fan-out/fan-in cycle for one question
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use triplecheck_domain::{ConsensusRound, ProviderId, ProviderResult, Question};
///
/// let question = Question::try_new("How often are dividends paid?").unwrap();
/// let mut round = ConsensusRound::new(
///     1,
///     question,
///     vec![(ProviderId::new("gpt4"), "GPT-4 Turbo".to_string()),
///          (ProviderId::new("sonar"), "Sonar".to_string())],
/// );
///
/// round.record(&ProviderId::new("gpt4"), ProviderResult::answered("Quarterly", Duration::from_secs(1))).unwrap();
/// assert!(!round.is_complete());
///
/// round.record(&ProviderId::new("sonar"), ProviderResult::answered("4 times a year", Duration::from_secs(2))).unwrap();
/// assert!(round.is_complete());
/// assert!(round.verdict().unwrap().is_unanimous());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRound {
    round_id: u64,
    question: Question,
    slots: Vec<ProviderSlot>,
    /// Milliseconds since epoch
    started_at: u64,
    complete: bool,
    verdict: Option<AgreementVerdict>,
}

impl ConsensusRound {
    /// Create a round with one pending slot per provider, in the given order
    pub fn new(
        round_id: u64,
        question: Question,
        providers: impl IntoIterator<Item = (ProviderId, String)>,
    ) -> Self {
        let slots = providers
            .into_iter()
            .map(|(provider, label)| ProviderSlot {
                provider,
                label,
                result: None,
            })
            .collect();

        Self {
            round_id,
            question,
            slots,
            started_at: current_timestamp(),
            complete: false,
            verdict: None,
        }
    }

    /// Write a provider's result into its slot.
    ///
    /// Each slot is written at most once. Filling the last pending slot
    /// completes the round and computes its verdict.
    pub fn record(
        &mut self,
        provider: &ProviderId,
        result: ProviderResult,
    ) -> Result<(), RoundError> {
        if self.complete {
            return Err(RoundError::Closed(self.round_id));
        }

        let round = self.round_id;
        let slot = self
            .slots
            .iter_mut()
            .find(|s| &s.provider == provider)
            .ok_or_else(|| RoundError::UnknownProvider {
                provider: provider.clone(),
                round,
            })?;

        if slot.result.is_some() {
            return Err(RoundError::AlreadyReported {
                provider: provider.clone(),
                round,
            });
        }
        slot.result = Some(result);

        if self.slots.iter().all(|s| s.result.is_some()) {
            self.finalize();
        }
        Ok(())
    }

    /// Fill every pending slot with the result built by `fill` and complete
    /// the round. Returns the number of slots that were still pending.
    pub fn expire_pending(&mut self, fill: impl Fn(&ProviderSlot) -> ProviderResult) -> usize {
        if self.complete {
            return 0;
        }

        let mut expired = 0;
        for slot in self.slots.iter_mut().filter(|s| s.result.is_none()) {
            let filled = fill(slot);
            slot.result = Some(filled);
            expired += 1;
        }
        self.finalize();
        expired
    }

    fn finalize(&mut self) {
        self.verdict = Some(AgreementVerdict::from_canonical(&self.canonical_answers()));
        self.complete = true;
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Verdict, available once the round is complete
    pub fn verdict(&self) -> Option<&AgreementVerdict> {
        self.verdict.as_ref()
    }

    /// Slots in provider registration order
    pub fn slots(&self) -> &[ProviderSlot] {
        &self.slots
    }

    pub fn slot(&self, provider: &ProviderId) -> Option<&ProviderSlot> {
        self.slots.iter().find(|s| &s.provider == provider)
    }

    /// Result reported by a provider, if it has reported
    pub fn result(&self, provider: &ProviderId) -> Option<&ProviderResult> {
        self.slot(provider).and_then(|s| s.result.as_ref())
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.slots.iter().map(|s| &s.provider)
    }

    /// Number of slots that have been written
    pub fn reported_count(&self) -> usize {
        self.slots.iter().filter(|s| s.result.is_some()).count()
    }

    pub fn pending_providers(&self) -> Vec<&ProviderId> {
        self.slots
            .iter()
            .filter(|s| s.is_pending())
            .map(|s| &s.provider)
            .collect()
    }

    /// Canonical answers of every reported slot, in registration order
    pub fn canonical_answers(&self) -> Vec<(ProviderId, String)> {
        self.slots
            .iter()
            .filter_map(|s| s.canonical_answer().map(|a| (s.provider.clone(), a)))
            .collect()
    }

    /// Equivalence classes over the canonical answers reported so far
    pub fn answer_classes(&self) -> Vec<AnswerClass> {
        AnswerClass::partition(&self.canonical_answers())
    }

    /// Display label for a provider, falling back to its id
    pub fn label_of<'a>(&'a self, provider: &'a ProviderId) -> &'a str {
        self.slot(provider)
            .map(|s| s.label.as_str())
            .unwrap_or(provider.as_str())
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
