//! Run Consensus use case
//!
//! Fans one question out to every registered provider, collects their timed
//! results as they arrive and closes the round with an agreement verdict.
//!
//! Provider tasks never touch the round directly: each sends its
//! `(ProviderId, ProviderResult)` over a channel, and a single collector task
//! per round writes the slots. Readers observe the round through a
//! [`watch`] channel, so every snapshot is consistent.

use crate::config::BehaviorConfig;
use crate::ports::answer_provider::AnswerProvider;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use triplecheck_domain::{ConsensusRound, DomainError, ProviderId, ProviderResult, Question};

type ProviderMessage = (ProviderId, ProviderResult);

/// Handle to a started round
///
/// Cloning is cheap; every clone observes the same round.
#[derive(Clone)]
pub struct RoundHandle {
    round_id: u64,
    rx: watch::Receiver<ConsensusRound>,
}

impl RoundHandle {
    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    /// Consistent copy of the round as it is right now. Never blocks.
    pub fn snapshot(&self) -> ConsensusRound {
        self.rx.borrow().clone()
    }

    pub fn is_complete(&self) -> bool {
        self.rx.borrow().is_complete()
    }

    /// Whether no further updates will arrive: the round completed or was
    /// abandoned.
    pub fn is_closed(&self) -> bool {
        self.rx.has_changed().is_err()
    }

    /// Wait until the round completes.
    ///
    /// If the round is abandoned first, returns its last (incomplete) state.
    pub async fn wait(mut self) -> ConsensusRound {
        if self.rx.wait_for(ConsensusRound::is_complete).await.is_err() {
            debug!("Round {} closed before completing", self.round_id);
        }
        self.rx.borrow().clone()
    }
}

/// Orchestrates consensus rounds over an ordered set of providers
///
/// At most one round is live at a time. Starting a new round abandons the
/// previous one: its in-flight provider calls run to completion, but their
/// results are discarded.
pub struct ConsensusOrchestrator {
    providers: Vec<Arc<dyn AnswerProvider>>,
    behavior: BehaviorConfig,
    progress: Arc<dyn ProgressNotifier>,
    /// Id of the live round; 0 before the first round
    live_round: Arc<AtomicU64>,
    current: Mutex<Option<RoundHandle>>,
}

impl ConsensusOrchestrator {
    /// Create an orchestrator. Provider order is the registration order used
    /// for slots, output and verdict tie-breaks.
    pub fn new(
        providers: Vec<Arc<dyn AnswerProvider>>,
        behavior: BehaviorConfig,
    ) -> Result<Self, DomainError> {
        if providers.is_empty() {
            return Err(DomainError::NoProviders);
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.id().clone()) {
                return Err(DomainError::DuplicateProvider(provider.id().to_string()));
            }
        }

        Ok(Self {
            providers,
            behavior,
            progress: Arc::new(NoProgress),
            live_round: Arc::new(AtomicU64::new(0)),
            current: Mutex::new(None),
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn providers(&self) -> &[Arc<dyn AnswerProvider>] {
        &self.providers
    }

    pub fn behavior(&self) -> &BehaviorConfig {
        &self.behavior
    }

    /// Start a round without waiting for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_round(&self, question: Question) -> RoundHandle {
        let round_id = self.live_round.fetch_add(1, Ordering::SeqCst) + 1;

        let round = ConsensusRound::new(
            round_id,
            question.clone(),
            self.providers
                .iter()
                .map(|p| (p.id().clone(), p.label().to_string())),
        );
        self.progress.on_round_start(&round);

        let (round_tx, round_rx) = watch::channel(round);
        let handle = RoundHandle {
            round_id,
            rx: round_rx,
        };

        let previous = self.lock_current().replace(handle.clone());
        if let Some(previous) = previous
            && !previous.is_complete()
        {
            info!(
                "Abandoning round {} in favour of round {}",
                previous.round_id(),
                round_id
            );
        }

        info!(
            "Starting round {} with {} providers",
            round_id,
            self.providers.len()
        );

        let (result_tx, result_rx) = mpsc::channel::<ProviderMessage>(self.providers.len());

        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let result_tx = result_tx.clone();
            let question = question.content().to_string();

            tokio::spawn(async move {
                debug!("Dispatching round {} to {}", round_id, provider.id());
                let result = provider.answer(&question).await;
                // The collector is gone once the round is closed or abandoned
                if result_tx
                    .send((provider.id().clone(), result))
                    .await
                    .is_err()
                {
                    debug!(
                        "Round {} closed before {} reported",
                        round_id,
                        provider.id()
                    );
                }
            });
        }
        drop(result_tx);

        tokio::spawn(collect_results(
            result_rx,
            round_tx,
            Arc::clone(&self.live_round),
            Arc::clone(&self.progress),
            self.behavior.round_timeout,
        ));

        handle
    }

    /// Start a round and wait for it to complete
    pub async fn run_round(&self, question: Question) -> ConsensusRound {
        self.start_round(question).wait().await
    }

    /// Snapshot of the live round, if any round was started
    pub fn current_snapshot(&self) -> Option<ConsensusRound> {
        self.lock_current().as_ref().map(RoundHandle::snapshot)
    }

    /// Id of the live round, if any round was started
    pub fn current_round_id(&self) -> Option<u64> {
        self.lock_current().as_ref().map(RoundHandle::round_id)
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<RoundHandle>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Collector task: the single writer of one round's slots
async fn collect_results(
    mut results: mpsc::Receiver<ProviderMessage>,
    round: watch::Sender<ConsensusRound>,
    live_round: Arc<AtomicU64>,
    progress: Arc<dyn ProgressNotifier>,
    round_timeout: Option<Duration>,
) {
    let round_id = round.borrow().round_id();
    // A timeout too large to represent never expires
    let deadline = round_timeout.and_then(|t| Instant::now().checked_add(t).map(|d| (d, t)));
    if round_timeout.is_some() && deadline.is_none() {
        debug!("Round {} timeout out of range, waiting without a deadline", round_id);
    }

    loop {
        let next = match deadline {
            Some((deadline, timeout)) => {
                match tokio::time::timeout_at(deadline, results.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        if live_round.load(Ordering::SeqCst) == round_id {
                            expire_round(&round, timeout, progress.as_ref());
                        }
                        return;
                    }
                }
            }
            None => results.recv().await,
        };

        let Some((provider, result)) = next else {
            // Every provider task has ended; only a panicked task leaves a gap
            if !round.borrow().is_complete() && live_round.load(Ordering::SeqCst) == round_id {
                warn!("Round {} lost provider tasks before completing", round_id);
                let mut closed = 0;
                round.send_modify(|r| {
                    closed = r.expire_pending(|slot| {
                        ProviderResult::failed(
                            format!("{}: provider task ended without an answer", slot.label),
                            Duration::ZERO,
                        )
                    })
                });
                if closed > 0 {
                    let snapshot = round.borrow().clone();
                    progress.on_round_complete(&snapshot);
                }
            }
            return;
        };

        if live_round.load(Ordering::SeqCst) != round_id {
            debug!(
                "Discarding late result from {} for abandoned round {}",
                provider, round_id
            );
            return;
        }

        info!(
            "Round {}: {} answered in {:.2}s",
            round_id,
            provider,
            result.elapsed_secs()
        );

        let mut recorded = Ok(());
        round.send_modify(|r| recorded = r.record(&provider, result));
        if let Err(e) = recorded {
            warn!("Ignoring result: {}", e);
            continue;
        }

        let snapshot = round.borrow().clone();
        if let Some(slot) = snapshot.slot(&provider) {
            progress.on_provider_complete(round_id, slot);
        }

        if snapshot.is_complete() {
            if let Some(verdict) = snapshot.verdict() {
                info!("Round {} complete: {}", round_id, verdict);
            }
            progress.on_round_complete(&snapshot);
            return;
        }
    }
}

fn expire_round(
    round: &watch::Sender<ConsensusRound>,
    timeout: Duration,
    progress: &dyn ProgressNotifier,
) {
    let mut expired = 0;
    round.send_modify(|r| {
        expired = r.expire_pending(|slot| {
            ProviderResult::failed(
                format!(
                    "{}: no answer within {}s",
                    slot.label,
                    timeout.as_secs_f64()
                ),
                timeout,
            )
        })
    });

    let snapshot = round.borrow().clone();
    warn!(
        "Round {} timed out with {} providers pending",
        snapshot.round_id(),
        expired
    );
    progress.on_round_complete(&snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;
    use triplecheck_domain::{AgreementVerdict, ProviderSlot, SlotStatus};

    /// Mock provider answering with a fixed text, optionally held back until
    /// the test releases a permit
    struct MockProvider {
        id: ProviderId,
        label: String,
        reply: Reply,
        gate: Option<Arc<Semaphore>>,
    }

    enum Reply {
        Fixed(&'static str),
        EchoQuestion,
        Fail,
    }

    impl MockProvider {
        fn fixed(id: &str, reply: &'static str) -> Arc<dyn AnswerProvider> {
            Arc::new(Self {
                id: ProviderId::new(id),
                label: id.to_uppercase(),
                reply: Reply::Fixed(reply),
                gate: None,
            })
        }

        fn failing(id: &str) -> Arc<dyn AnswerProvider> {
            Arc::new(Self {
                id: ProviderId::new(id),
                label: id.to_uppercase(),
                reply: Reply::Fail,
                gate: None,
            })
        }

        fn gated(id: &str, reply: Reply, gate: Arc<Semaphore>) -> Arc<dyn AnswerProvider> {
            Arc::new(Self {
                id: ProviderId::new(id),
                label: id.to_uppercase(),
                reply,
                gate: Some(gate),
            })
        }
    }

    #[async_trait]
    impl AnswerProvider for MockProvider {
        fn id(&self) -> &ProviderId {
            &self.id
        }

        fn label(&self) -> &str {
            &self.label
        }

        async fn answer(&self, question: &str) -> ProviderResult {
            if let Some(gate) = &self.gate {
                let permit = gate.acquire().await.unwrap();
                permit.forget();
            }
            let elapsed = Duration::from_millis(10);
            match self.reply {
                Reply::Fixed(text) => ProviderResult::answered(text, elapsed),
                Reply::EchoQuestion => ProviderResult::answered(format!("echo {question}"), elapsed),
                Reply::Fail => ProviderResult::failed(
                    format!("Failed to process with {}: HTTP 500", self.label),
                    elapsed,
                ),
            }
        }
    }

    /// Records progress events as strings
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_round_start(&self, round: &ConsensusRound) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {}", round.round_id()));
        }

        fn on_provider_complete(&self, round_id: u64, slot: &ProviderSlot) {
            self.events
                .lock()
                .unwrap()
                .push(format!("provider {} {}", round_id, slot.provider));
        }

        fn on_round_complete(&self, round: &ConsensusRound) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {}", round.round_id()));
        }
    }

    fn question(text: &str) -> Question {
        Question::try_new(text).unwrap()
    }

    fn orchestrator(providers: Vec<Arc<dyn AnswerProvider>>) -> ConsensusOrchestrator {
        ConsensusOrchestrator::new(providers, BehaviorConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_empty_provider_list() {
        let result = ConsensusOrchestrator::new(vec![], BehaviorConfig::default());
        assert!(matches!(result, Err(DomainError::NoProviders)));
    }

    #[test]
    fn test_rejects_duplicate_provider_ids() {
        let result = ConsensusOrchestrator::new(
            vec![MockProvider::fixed("a", "B"), MockProvider::fixed("a", "C")],
            BehaviorConfig::default(),
        );
        assert!(matches!(result, Err(DomainError::DuplicateProvider(id)) if id == "a"));
    }

    #[tokio::test]
    async fn test_unanimous_round() {
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("gpt4", "Quarterly"),
            MockProvider::fixed("sonar_pro", "**4**"),
            MockProvider::fixed("sonar", "four times a year"),
        ]);

        let round = orchestrator.run_round(question("How often?")).await;

        assert!(round.is_complete());
        assert_eq!(round.reported_count(), 3);
        assert_eq!(
            round.verdict(),
            Some(&AgreementVerdict::Unanimous {
                answer: "4".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_pair_agreement_flags_outlier() {
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("gpt4", "4"),
            MockProvider::fixed("sonar_pro", "quarterly"),
            MockProvider::fixed("sonar", "semi-annually"),
        ]);

        let round = orchestrator.run_round(question("How often?")).await;
        let verdict = round.verdict().unwrap();

        assert!(verdict.is_partial());
        assert_eq!(verdict.agreed_answer(), Some("4"));
        assert_eq!(verdict.outliers(), &[ProviderId::new("sonar")]);
    }

    #[tokio::test]
    async fn test_all_distinct_is_no_agreement() {
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("gpt4", "4"),
            MockProvider::fixed("sonar_pro", "2"),
            MockProvider::fixed("sonar", "1"),
        ]);

        let round = orchestrator.run_round(question("How often?")).await;
        assert!(round.verdict().unwrap().is_no_agreement());
    }

    #[tokio::test]
    async fn test_failed_provider_still_completes_round() {
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("gpt4", "B"),
            MockProvider::fixed("sonar_pro", "b"),
            MockProvider::failing("sonar"),
        ]);

        let round = orchestrator.run_round(question("Which?")).await;

        assert!(round.is_complete());
        let failed = round.slot(&ProviderId::new("sonar")).unwrap();
        assert_eq!(failed.status(), SlotStatus::Failed);
        let text = &failed.result.as_ref().unwrap().text;
        assert!(text.starts_with("Failed to process with SONAR"));

        let verdict = round.verdict().unwrap();
        assert!(verdict.is_partial());
        assert_eq!(verdict.agreed_answer(), Some("b"));
    }

    #[tokio::test]
    async fn test_snapshot_is_readable_while_pending() {
        let gate = Arc::new(Semaphore::new(0));
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("gpt4", "A"),
            MockProvider::gated("sonar", Reply::Fixed("A"), Arc::clone(&gate)),
        ]);

        let handle = orchestrator.start_round(question("Which?"));

        // Wait for the ungated provider without blocking on the round
        let mut snapshot = handle.snapshot();
        while snapshot.reported_count() < 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            snapshot = handle.snapshot();
        }
        assert!(!snapshot.is_complete());
        assert!(snapshot.verdict().is_none());
        assert_eq!(snapshot.pending_providers(), vec![&ProviderId::new("sonar")]);

        let current = orchestrator.current_snapshot().unwrap();
        assert_eq!(current.round_id(), handle.round_id());

        gate.add_permits(1);
        let round = handle.wait().await;
        assert!(round.is_complete());
        assert!(round.verdict().unwrap().is_unanimous());
    }

    #[tokio::test]
    async fn test_new_round_discards_stragglers() {
        let gate = Arc::new(Semaphore::new(0));
        let progress = Arc::new(RecordingProgress::default());
        let orchestrator = orchestrator(vec![
            MockProvider::fixed("fast", "A"),
            MockProvider::gated("slow", Reply::EchoQuestion, Arc::clone(&gate)),
        ])
        .with_progress(progress.clone());

        let first = orchestrator.start_round(question("first"));
        let second = orchestrator.start_round(question("second"));
        assert_eq!(orchestrator.current_round_id(), Some(second.round_id()));

        // Release both rounds' slow calls
        gate.add_permits(2);

        let second_round = second.wait().await;
        assert!(second_round.is_complete());
        let slow = second_round.result(&ProviderId::new("slow")).unwrap();
        assert_eq!(slow.text, "echo second");

        let first_round = first.clone().wait().await;
        assert!(!first_round.is_complete());
        assert!(first.is_closed());
        assert!(first_round.result(&ProviderId::new("slow")).is_none());

        let events = progress.events();
        assert!(!events.contains(&format!("complete {}", first_round.round_id())));
        assert!(!events.contains(&format!("provider {} slow", first_round.round_id())));
        assert!(events.contains(&format!("complete {}", second_round.round_id())));
    }

    #[tokio::test]
    async fn test_round_timeout_fills_pending_slots() {
        let gate = Arc::new(Semaphore::new(0));
        let behavior = BehaviorConfig::default().with_round_timeout(Duration::from_millis(50));
        let orchestrator = ConsensusOrchestrator::new(
            vec![
                MockProvider::fixed("gpt4", "C"),
                MockProvider::gated("stuck", Reply::Fixed("C"), gate),
            ],
            behavior,
        )
        .unwrap();

        let round = orchestrator.run_round(question("Which?")).await;

        assert!(round.is_complete());
        let stuck = round.result(&ProviderId::new("stuck")).unwrap();
        assert!(!stuck.success);
        assert!(stuck.text.contains("no answer within"));
        assert!(round.verdict().unwrap().is_no_agreement());
    }

    #[tokio::test]
    async fn test_unrepresentable_round_timeout_waits_for_every_provider() {
        let behavior = BehaviorConfig::default().with_round_timeout(Duration::from_secs(u64::MAX));
        let orchestrator = ConsensusOrchestrator::new(
            vec![MockProvider::fixed("gpt4", "C"), MockProvider::fixed("sonar", "c")],
            behavior,
        )
        .unwrap();

        let round = orchestrator.run_round(question("Which?")).await;

        assert!(round.is_complete());
        assert!(round.slots().iter().all(|s| s.status() == SlotStatus::Answered));
        assert!(round.verdict().unwrap().is_unanimous());
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let progress = Arc::new(RecordingProgress::default());
        let orchestrator = orchestrator(vec![MockProvider::fixed("gpt4", "D")])
            .with_progress(progress.clone());

        let round = orchestrator.run_round(question("Which?")).await;
        let id = round.round_id();

        assert_eq!(
            progress.events(),
            vec![
                format!("start {id}"),
                format!("provider {id} gpt4"),
                format!("complete {id}"),
            ]
        );
    }
}
