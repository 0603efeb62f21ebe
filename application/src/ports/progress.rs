//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus round.

use triplecheck_domain::{ConsensusRound, ProviderSlot};

/// Callback for progress updates during a consensus round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways. Callbacks are invoked from the round's
/// collector task and are never issued for an abandoned round.
pub trait ProgressNotifier: Send + Sync {
    /// Called once the round is created and before any provider is dispatched
    fn on_round_start(&self, round: &ConsensusRound);

    /// Called when a provider's slot has been filled
    fn on_provider_complete(&self, round_id: u64, slot: &ProviderSlot);

    /// Called when every slot is filled and the verdict is available
    fn on_round_complete(&self, round: &ConsensusRound);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: &ConsensusRound) {}
    fn on_provider_complete(&self, _round_id: u64, _slot: &ProviderSlot) {}
    fn on_round_complete(&self, _round: &ConsensusRound) {}
}
