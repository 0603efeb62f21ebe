//! Progress reporting via the application's progress port

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use triplecheck_application::ProgressNotifier;
use triplecheck_domain::{ConsensusRound, ProviderSlot, SlotStatus};

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so stdout carries only results.
pub struct SimpleProgress;

impl SimpleProgress {
    fn slot_line(slot: &ProviderSlot) -> String {
        let elapsed = slot
            .result
            .as_ref()
            .map(|r| format!("({:.2}s)", r.elapsed_secs()))
            .unwrap_or_default();

        match slot.status() {
            SlotStatus::Answered => format!(
                "  {} {} {}",
                "v".green(),
                slot.label,
                elapsed.dimmed()
            ),
            SlotStatus::Failed => format!(
                "  {} {} {} (failed)",
                "x".red(),
                slot.label,
                elapsed.dimmed()
            ),
            SlotStatus::Pending => format!("  {} {}", "…".dimmed(), slot.label),
        }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: &ConsensusRound) {
        eprintln!(
            "{} {} ({} providers)",
            "->".cyan(),
            ConsoleFormatter::question_summary(round).bold(),
            round.slots().len()
        );
    }

    fn on_provider_complete(&self, _round_id: u64, slot: &ProviderSlot) {
        eprintln!("{}", Self::slot_line(slot));
    }

    fn on_round_complete(&self, _round: &ConsensusRound) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use triplecheck_domain::{ProviderId, ProviderResult};

    #[test]
    fn test_slot_lines() {
        colored::control::set_override(false);

        let mut slot = ProviderSlot {
            provider: ProviderId::new("sonar"),
            label: "Sonar".to_string(),
            result: None,
        };
        assert_eq!(SimpleProgress::slot_line(&slot), "  … Sonar");

        slot.result = Some(ProviderResult::answered("B", Duration::from_millis(500)));
        assert_eq!(SimpleProgress::slot_line(&slot), "  v Sonar (0.50s)");

        slot.result = Some(ProviderResult::failed("boom", Duration::from_secs(2)));
        assert_eq!(SimpleProgress::slot_line(&slot), "  x Sonar (2.00s) (failed)");
    }
}
