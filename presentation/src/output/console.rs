//! Console output formatter for round results

use colored::Colorize;
use triplecheck_domain::core::string::{single_line, truncate};
use triplecheck_domain::{
    AgreementVerdict, ConsensusRound, OutputFormat, ProviderId, ProviderSlot, SlotStatus,
};

/// Maximum question length in headers
const QUESTION_DISPLAY_LEN: usize = 100;

/// Maximum answer length in live status lines
const ANSWER_PREVIEW_LEN: usize = 60;

/// Formats rounds for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a round in the requested format
    pub fn render(round: &ConsensusRound, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(round),
            OutputFormat::Verdict => Self::format_verdict_only(round),
            OutputFormat::Json => Self::format_json(round),
        }
    }

    /// Format the complete round: every provider, then the verdict
    pub fn format(round: &ConsensusRound) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Triple Check"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            round.question()
        ));

        for slot in round.slots() {
            output.push_str(&Self::format_slot(slot));
        }

        output.push('\n');
        output.push_str(&Self::verdict_line(round));
        output.push('\n');
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(round: &ConsensusRound) -> String {
        serde_json::to_string_pretty(round).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict_only(round: &ConsensusRound) -> String {
        let mut output = Self::verdict_line(round);
        if let Some(answer) = round.verdict().and_then(AgreementVerdict::agreed_answer) {
            output.push_str(&format!("\n{} {}", "Answer:".bold(), answer.to_uppercase()));
        }
        output
    }

    /// One-line question for status displays
    pub fn question_summary(round: &ConsensusRound) -> String {
        truncate(&single_line(round.question().content()), QUESTION_DISPLAY_LEN)
    }

    /// One-line answer for live status displays
    pub fn answer_preview(text: &str) -> String {
        truncate(&single_line(text), ANSWER_PREVIEW_LEN)
    }

    /// Human-readable verdict sentence, colored by outcome
    pub fn verdict_line(round: &ConsensusRound) -> String {
        match round.verdict() {
            None => {
                let pending: Vec<_> = round
                    .pending_providers()
                    .into_iter()
                    .map(|p| round.label_of(p).to_string())
                    .collect();
                format!(
                    "{} (waiting for {})",
                    "Round incomplete".yellow().bold(),
                    join_names(&pending)
                )
            }
            Some(AgreementVerdict::Unanimous { answer }) => format!(
                "{} {}",
                "All providers agree:".green().bold(),
                answer.to_uppercase().bold()
            ),
            Some(AgreementVerdict::Partial {
                answer,
                agreeing,
                outliers,
            }) => {
                let agreeing = labels(round, agreeing);
                let outliers = labels(round, outliers);
                let verb = if outliers.len() == 1 { "differs" } else { "differ" };
                format!(
                    "{} {}",
                    format!(
                        "{} agree, but {} {}:",
                        join_names(&agreeing),
                        join_names(&outliers),
                        verb
                    )
                    .yellow()
                    .bold(),
                    answer.to_uppercase().bold()
                )
            }
            Some(AgreementVerdict::NoAgreement) => {
                "All providers give different answers".red().bold().to_string()
            }
        }
    }

    fn format_slot(slot: &ProviderSlot) -> String {
        let title = format!("── {} ──", slot.label);
        let Some(result) = &slot.result else {
            return format!("{}\n{}\n\n", title.dimmed(), "(no answer)".dimmed());
        };

        let title = match slot.status() {
            SlotStatus::Answered => title.yellow().bold(),
            _ => title.red().bold(),
        };
        format!(
            "{}\n{}\n{} {}  {}\n\n",
            title,
            result.text.trim(),
            "canonical:".dimmed(),
            slot.canonical_answer().unwrap_or_default(),
            format!("({:.2}s)", result.elapsed_secs()).dimmed()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

fn labels(round: &ConsensusRound, providers: &[ProviderId]) -> Vec<String> {
    providers
        .iter()
        .map(|p| round.label_of(p).to_string())
        .collect()
}

/// "A", "A and B", "A, B and C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use triplecheck_domain::{ProviderResult, Question};

    fn round(answers: &[(&str, &str, Option<&str>)]) -> ConsensusRound {
        let mut round = ConsensusRound::new(
            1,
            Question::try_new("How often?").unwrap(),
            answers
                .iter()
                .map(|(id, label, _)| (ProviderId::new(*id), label.to_string())),
        );
        for (id, _, text) in answers {
            if let Some(text) = text {
                round
                    .record(
                        &ProviderId::new(*id),
                        ProviderResult::answered(*text, Duration::from_millis(1200)),
                    )
                    .unwrap();
            }
        }
        round
    }

    #[test]
    fn test_join_names() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_names(&names(&["A"])), "A");
        assert_eq!(join_names(&names(&["A", "B"])), "A and B");
        assert_eq!(join_names(&names(&["A", "B", "C"])), "A, B and C");
    }

    #[test]
    fn test_unanimous_line() {
        colored::control::set_override(false);
        let round = round(&[
            ("gpt4", "GPT-4", Some("B")),
            ("sonar", "Sonar", Some("**B**")),
        ]);
        assert_eq!(
            ConsoleFormatter::verdict_line(&round),
            "All providers agree: B"
        );
    }

    #[test]
    fn test_partial_line_names_outlier() {
        colored::control::set_override(false);
        let round = round(&[
            ("gpt4", "GPT-4", Some("quarterly")),
            ("sonar_pro", "Sonar Pro", Some("4")),
            ("sonar", "Sonar", Some("annually")),
        ]);
        assert_eq!(
            ConsoleFormatter::verdict_line(&round),
            "GPT-4 and Sonar Pro agree, but Sonar differs: 4"
        );
    }

    #[test]
    fn test_no_agreement_line() {
        colored::control::set_override(false);
        let round = round(&[
            ("gpt4", "GPT-4", Some("A")),
            ("sonar_pro", "Sonar Pro", Some("B")),
            ("sonar", "Sonar", Some("C")),
        ]);
        assert_eq!(
            ConsoleFormatter::verdict_line(&round),
            "All providers give different answers"
        );
    }

    #[test]
    fn test_incomplete_round_line() {
        colored::control::set_override(false);
        let round = round(&[
            ("gpt4", "GPT-4", Some("A")),
            ("sonar", "Sonar", None),
        ]);
        assert_eq!(
            ConsoleFormatter::verdict_line(&round),
            "Round incomplete (waiting for Sonar)"
        );
    }

    #[test]
    fn test_full_output_lists_canonical_answers() {
        colored::control::set_override(false);
        let round = round(&[
            ("gpt4", "GPT-4", Some("The answer is Quarterly.")),
            ("sonar", "Sonar", Some("4")),
        ]);
        let output = ConsoleFormatter::render(&round, OutputFormat::Full);

        assert!(output.contains("── GPT-4 ──"));
        assert!(output.contains("The answer is Quarterly."));
        assert!(output.contains("canonical: 4"));
        assert!(output.contains("(1.20s)"));
        assert!(output.contains("All providers agree: 4"));
    }

    #[test]
    fn test_json_output() {
        let round = round(&[("gpt4", "GPT-4", Some("C"))]);
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::render(&round, OutputFormat::Json)).unwrap();

        assert_eq!(json["complete"], true);
        assert_eq!(json["verdict"]["kind"], "unanimous");
        assert_eq!(json["slots"][0]["result"]["text"], "C");
    }

    #[test]
    fn test_question_summary_truncates() {
        let mut long = "word ".repeat(40);
        long.push_str("\nA) one");
        let round = ConsensusRound::new(
            1,
            Question::try_new(long).unwrap(),
            [(ProviderId::new("a"), "A".to_string())],
        );
        let summary = ConsoleFormatter::question_summary(&round);
        assert!(summary.len() <= 100);
        assert!(summary.ends_with("..."));
        assert!(!summary.contains('\n'));
    }
}
