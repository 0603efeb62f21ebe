//! Configuration file loading for triple-check
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./triplecheck.toml` or `./.triplecheck.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/triple-check/config.toml`
//! 4. Fallback: `~/.config/triple-check/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBehaviorConfig, FileConfig, FileOcrConfig, FileOutputConfig, FileProviderConfig,
    ProviderKind,
};
pub use loader::ConfigLoader;
