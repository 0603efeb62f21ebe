//! Live per-provider view of a running round
//!
//! Stands in for an overlay display loop: it never blocks on the round, it
//! re-reads the latest snapshot on every tick and redraws.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;
use triplecheck_application::RoundHandle;
use triplecheck_domain::{ConsensusRound, ProviderSlot, SlotStatus};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Draws one spinner per provider and follows a round to its end
pub struct LiveRoundView {
    poll_interval: Duration,
}

impl LiveRoundView {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finished_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("  {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Message shown for a filled slot
    fn slot_message(slot: &ProviderSlot) -> String {
        let Some(result) = &slot.result else {
            return "processing...".dimmed().to_string();
        };
        let elapsed = format!("({:.2}s)", result.elapsed_secs());
        match slot.status() {
            SlotStatus::Answered => format!(
                "{} {} {}",
                "v".green(),
                ConsoleFormatter::answer_preview(&result.text),
                elapsed.dimmed()
            ),
            _ => format!(
                "{} {} {}",
                "x".red(),
                ConsoleFormatter::answer_preview(&result.text).red(),
                elapsed.dimmed()
            ),
        }
    }

    fn question_header(round: &ConsensusRound) -> String {
        format!(
            "{} {}",
            "Question:".cyan().bold(),
            ConsoleFormatter::question_summary(round)
        )
    }

    /// Follow the round until it completes or is abandoned, returning the
    /// last snapshot seen.
    pub async fn follow(&self, handle: &RoundHandle) -> ConsensusRound {
        let multi = MultiProgress::new();
        let mut snapshot = handle.snapshot();

        // Spinners still draw when the header line cannot be written
        if let Err(e) = multi.println(Self::question_header(&snapshot)) {
            warn!("Failed to draw question header: {}", e);
        }

        let bars: Vec<ProgressBar> = snapshot
            .slots()
            .iter()
            .map(|slot| {
                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(Self::spinner_style());
                bar.set_prefix(slot.label.clone());
                bar.set_message(Self::slot_message(slot));
                bar.enable_steady_tick(self.poll_interval);
                bar
            })
            .collect();

        loop {
            // Read the flag first so the snapshot below is never older than it
            let closed = handle.is_closed();
            snapshot = handle.snapshot();

            for (slot, bar) in snapshot.slots().iter().zip(&bars) {
                if !slot.is_pending() && !bar.is_finished() {
                    bar.set_style(Self::finished_style());
                    bar.finish_with_message(Self::slot_message(slot));
                }
            }

            if snapshot.is_complete() || closed {
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        for bar in bars.iter().filter(|b| !b.is_finished()) {
            bar.abandon_with_message("abandoned".dimmed().to_string());
        }
        snapshot
    }
}

impl Default for LiveRoundView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use triplecheck_application::{AnswerProvider, BehaviorConfig, ConsensusOrchestrator};
    use triplecheck_domain::{ProviderId, ProviderResult, Question};

    struct SlowProvider {
        id: ProviderId,
        delay: Duration,
    }

    #[async_trait]
    impl AnswerProvider for SlowProvider {
        fn id(&self) -> &ProviderId {
            &self.id
        }

        fn label(&self) -> &str {
            self.id.as_str()
        }

        async fn answer(&self, _question: &str) -> ProviderResult {
            tokio::time::sleep(self.delay).await;
            ProviderResult::answered("A", self.delay)
        }
    }

    #[tokio::test]
    async fn test_follow_returns_completed_round() {
        let providers: Vec<Arc<dyn AnswerProvider>> = vec![
            Arc::new(SlowProvider {
                id: ProviderId::new("fast"),
                delay: Duration::from_millis(5),
            }),
            Arc::new(SlowProvider {
                id: ProviderId::new("slow"),
                delay: Duration::from_millis(40),
            }),
        ];
        let orchestrator =
            ConsensusOrchestrator::new(providers, BehaviorConfig::default()).unwrap();

        let handle = orchestrator.start_round(Question::try_new("Which?").unwrap());
        let round = LiveRoundView::new()
            .with_poll_interval(Duration::from_millis(5))
            .follow(&handle)
            .await;

        assert!(round.is_complete());
        assert!(round.verdict().unwrap().is_unanimous());
    }

    #[test]
    fn test_pending_slot_message() {
        colored::control::set_override(false);
        let slot = ProviderSlot {
            provider: ProviderId::new("a"),
            label: "A".to_string(),
            result: None,
        };
        assert_eq!(LiveRoundView::slot_message(&slot), "processing...");
    }

    #[test]
    fn test_question_header() {
        colored::control::set_override(false);
        let round = ConsensusRound::new(
            1,
            Question::try_new("How often are dividends paid?").unwrap(),
            vec![(ProviderId::new("a"), "A".to_string())],
        );
        assert_eq!(
            LiveRoundView::question_header(&round),
            "Question: How often are dividends paid?"
        );
    }
}
