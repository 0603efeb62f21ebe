//! Presentation layer for triple-check
//!
//! This crate contains CLI definitions, output formatters,
//! progress displays, and the interactive capture REPL.

pub mod capture;
pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use capture::{CaptureError, CaptureRunner};
pub use chat::CaptureRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use config::{DisplayOptions, ProgressMode};
pub use output::console::ConsoleFormatter;
pub use progress::live::LiveRoundView;
pub use progress::reporter::SimpleProgress;
