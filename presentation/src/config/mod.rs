//! Presentation-level configuration
//!
//! How rounds are displayed, resolved from CLI flags and the `[output]`
//! config section.

use serde::{Deserialize, Serialize};
use triplecheck_domain::OutputFormat;

/// How progress is shown while a round runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// One live spinner per provider
    #[default]
    Live,
    /// One line per provider as results arrive
    Plain,
    /// Nothing until the result
    Quiet,
}

impl ProgressMode {
    pub fn from_flags(quiet: bool, plain: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if plain {
            Self::Plain
        } else {
            Self::Live
        }
    }
}

/// Display options for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayOptions {
    pub format: OutputFormat,
    pub progress: ProgressMode,
}

impl DisplayOptions {
    /// Progress output would interleave with JSON on a terminal, so JSON
    /// implies quiet progress.
    pub fn effective_progress(&self) -> ProgressMode {
        if self.format == OutputFormat::Json {
            ProgressMode::Quiet
        } else {
            self.progress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_mode_from_flags() {
        assert_eq!(ProgressMode::from_flags(false, false), ProgressMode::Live);
        assert_eq!(ProgressMode::from_flags(false, true), ProgressMode::Plain);
        assert_eq!(ProgressMode::from_flags(true, true), ProgressMode::Quiet);
    }

    #[test]
    fn test_json_is_quiet() {
        let options = DisplayOptions {
            format: OutputFormat::Json,
            progress: ProgressMode::Live,
        };
        assert_eq!(options.effective_progress(), ProgressMode::Quiet);
    }
}
