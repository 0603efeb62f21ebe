//! CLI entrypoint for triple-check
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use triplecheck_application::{ConsensusOrchestrator, ProgressNotifier};
use triplecheck_domain::{ConfigIssue, Question, Severity};
use triplecheck_infrastructure::{ConfigLoader, FileConfig, GoogleVisionOcr, build_providers};
use triplecheck_presentation::{
    CaptureRepl, CaptureRunner, Cli, DisplayOptions, ProgressMode, SimpleProgress,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting triple-check");

    // === Configuration ===
    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let issues = config.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }
    if ConfigIssue::any_errors(&issues) {
        for issue in issues.iter().filter(|i| i.severity == Severity::Error) {
            eprintln!("config error: {}", issue.message);
        }
        bail!("Invalid configuration");
    }

    let mut behavior = config.behavior_config();
    if let Some(secs) = cli.round_timeout {
        if secs == 0 {
            bail!("--round-timeout must be greater than 0");
        }
        behavior = behavior.with_round_timeout(Duration::from_secs(secs));
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let display = DisplayOptions {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        progress: ProgressMode::from_flags(cli.quiet, cli.plain),
    };

    // === Dependency Injection ===
    let providers = build_providers(&config, &behavior, &cli.provider)?;
    let request_timeout = behavior.request_timeout;

    let mut orchestrator = ConsensusOrchestrator::new(providers, behavior)?;
    if display.effective_progress() == ProgressMode::Plain {
        let progress: Arc<dyn ProgressNotifier> = Arc::new(SimpleProgress);
        orchestrator = orchestrator.with_progress(progress);
    }

    let mut runner = CaptureRunner::new(Arc::new(orchestrator), display);
    if let Some(api_key) = config.ocr.resolve_api_key() {
        let ocr = GoogleVisionOcr::new(&config.ocr.endpoint, api_key, request_timeout)?;
        runner = runner.with_extractor(Arc::new(ocr));
    } else {
        info!("OCR disabled: {} is not set", config.ocr.api_key_env);
    }

    // Chat mode
    if cli.chat {
        let mut repl = CaptureRepl::new(runner);
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question or image is required
    let question = if let Some(path) = &cli.image {
        match runner.question_from_image(path).await? {
            Some(question) => question,
            None => {
                eprintln!("Failed to extract text from image");
                return Ok(());
            }
        }
    } else {
        let text = match cli.question {
            Some(q) => q,
            None => bail!("Question is required. Use --image or --chat for other modes."),
        };
        match Question::try_new(text) {
            Some(question) => question,
            None => bail!("Question cannot be empty"),
        }
    };

    let round = runner.run(question).await;

    // Output results
    println!("{}", runner.render(&round));

    Ok(())
}
