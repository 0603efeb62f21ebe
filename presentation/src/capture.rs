//! One capture action: question in, live round, rendered result out
//!
//! Shared by the one-shot CLI and the capture REPL.

use crate::config::{DisplayOptions, ProgressMode};
use crate::output::console::ConsoleFormatter;
use crate::progress::live::LiveRoundView;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use triplecheck_application::{ConsensusOrchestrator, TextExtractor};
use triplecheck_domain::{ConsensusRound, Question};

/// Errors that can occur while capturing a question
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("OCR is not configured")]
    OcrUnavailable,
}

/// Runs capture actions against one orchestrator
pub struct CaptureRunner {
    orchestrator: Arc<ConsensusOrchestrator>,
    extractor: Option<Arc<dyn TextExtractor>>,
    display: DisplayOptions,
}

impl CaptureRunner {
    pub fn new(orchestrator: Arc<ConsensusOrchestrator>, display: DisplayOptions) -> Self {
        Self {
            orchestrator,
            extractor: None,
            display,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn orchestrator(&self) -> &ConsensusOrchestrator {
        &self.orchestrator
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    pub fn has_ocr(&self) -> bool {
        self.extractor.is_some()
    }

    /// Extract a question from an image file.
    ///
    /// `Ok(None)` means the image was read but no text was found; no round
    /// should be started.
    pub async fn question_from_image(&self, path: &Path) -> Result<Option<Question>, CaptureError> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or(CaptureError::OcrUnavailable)?;

        let image = tokio::fs::read(path)
            .await
            .map_err(|source| CaptureError::ReadImage {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Read {} bytes from {}", image.len(), path.display());
        Ok(Question::from_extraction(
            extractor.extract_text(&image).await,
        ))
    }

    /// Run one round, showing progress according to the display options.
    ///
    /// Returns the last snapshot, which is incomplete only if the round was
    /// abandoned.
    pub async fn run(&self, question: Question) -> ConsensusRound {
        let handle = self.orchestrator.start_round(question);
        match self.display.effective_progress() {
            ProgressMode::Live => LiveRoundView::new().follow(&handle).await,
            ProgressMode::Plain | ProgressMode::Quiet => handle.wait().await,
        }
    }

    /// Render a round in the configured output format
    pub fn render(&self, round: &ConsensusRound) -> String {
        ConsoleFormatter::render(round, self.display.format)
    }
}
