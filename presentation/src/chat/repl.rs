//! REPL (Read-Eval-Print Loop) for interactive capture

use crate::capture::{CaptureError, CaptureRunner};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::Path;
use tracing::warn;
use triplecheck_domain::{ConsensusRound, Question};

/// Maximum number of history entries kept on disk
const HISTORY_SIZE: usize = 1000;

/// What the REPL should do after a slash command
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Help,
    Providers,
    Last,
    Image(&'a str),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name {
            "/quit" | "/exit" | "/q" => Command::Quit,
            "/help" | "/h" | "/?" => Command::Help,
            "/providers" => Command::Providers,
            "/last" => Command::Last,
            "/image" | "/i" if !arg.is_empty() => Command::Image(arg),
            _ => Command::Unknown(line),
        }
    }
}

/// Interactive capture REPL
pub struct CaptureRepl {
    runner: CaptureRunner,
    last: Option<ConsensusRound>,
}

impl CaptureRepl {
    /// Create a new CaptureRepl
    pub fn new(runner: CaptureRunner) -> Self {
        Self { runner, last: None }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("triple-check").join("history.txt"));
        if let Some(path) = &history_path {
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("History disabled: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("triple-check".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(buffer) => {
                    let line = buffer.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    if let Some(question) = Question::try_new(line) {
                        self.process_question(question).await;
                    }
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => {
                    println!("^C");
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Triple Check - Capture Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Providers: {}", self.provider_labels().join(", "));
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Type a question to ask every provider, or:");
        println!("  /image <path>    - Extract the question from an image");
        println!("  /providers       - Show registered providers");
        println!("  /last            - Show the previous round again");
        println!("  /help, /h, /?    - Show this help");
        println!("  /quit, /exit, /q - Exit");
        println!();
        println!("Press Ctrl-C during a round to abandon it.");
        println!();
    }

    fn provider_labels(&self) -> Vec<String> {
        self.runner
            .orchestrator()
            .providers()
            .iter()
            .map(|p| p.label().to_string())
            .collect()
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        match Command::parse(line) {
            Command::Quit => {
                println!("Bye!");
                return true;
            }
            Command::Help => {
                println!();
                Self::print_help();
            }
            Command::Providers => {
                println!();
                println!("Registered providers:");
                for provider in self.runner.orchestrator().providers() {
                    println!("  - {} ({})", provider.label(), provider.id());
                }
                println!();
            }
            Command::Last => match &self.last {
                Some(round) => println!("{}", self.runner.render(round)),
                None => println!("No round yet"),
            },
            Command::Image(path) => self.process_image(Path::new(path)).await,
            Command::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_image(&mut self, path: &Path) {
        match self.runner.question_from_image(path).await {
            Ok(Some(question)) => self.process_question(question).await,
            Ok(None) => eprintln!("{}", "Failed to extract text from image".red()),
            Err(CaptureError::OcrUnavailable) => {
                eprintln!(
                    "{}",
                    "OCR is not configured; set the [ocr] API key to use /image".red()
                );
            }
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
    }

    async fn process_question(&mut self, question: Question) {
        println!();

        let outcome = tokio::select! {
            round = self.runner.run(question) => Some(round),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(round) => {
                println!("{}", self.runner.render(&round));
                self.last = Some(round);
            }
            // Late answers are discarded once the next round starts
            None => println!("{}", "Round abandoned".yellow()),
        }
        println!();
    }
}
