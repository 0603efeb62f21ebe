//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for round results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every provider's answer, canonical form and timing, then the verdict
    Full,
    /// Only the verdict
    Verdict,
    /// JSON output
    Json,
}

impl From<OutputFormat> for triplecheck_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Verdict => Self::Verdict,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for triple-check
#[derive(Parser, Debug)]
#[command(name = "triple-check")]
#[command(author, version, about = "Ask several LLMs the same multiple-choice question and check whether they agree")]
#[command(long_about = r#"
triple-check sends one question to several answer providers at once,
normalizes their answers ("**B**", "The answer is quarterly.", "four times a
year") and reports whether they agree.

Verdicts:
  All providers agree                  every canonical answer is the same
  X and Y agree, but Z differs         the largest group has two or more members
  All providers give different answers no two canonical answers match

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./triplecheck.toml       Project-level config
3. ~/.config/triple-check/config.toml   Global config

Example:
  triple-check "How often are dividends paid? A) monthly B) quarterly"
  triple-check --image question.png
  triple-check -p sonar_pro "Which rate applies?"
  triple-check --chat
"#)]
pub struct Cli {
    /// The question to ask (not required with --image or in chat mode)
    pub question: Option<String>,

    /// Extract the question from an image via OCR
    #[arg(short, long, value_name = "PATH", conflicts_with = "question")]
    pub image: Option<PathBuf>,

    /// Start the interactive capture REPL
    #[arg(short, long)]
    pub chat: bool,

    /// Providers to ask (can be specified multiple times; default: all enabled)
    #[arg(short, long, value_name = "ID")]
    pub provider: Vec<String>,

    /// Output format (default: from config, else full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Give up on providers that have not answered after this many seconds
    #[arg(long, value_name = "SECS")]
    pub round_timeout: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Line-by-line progress instead of live spinners
    #[arg(long, conflicts_with = "quiet")]
    pub plain: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
