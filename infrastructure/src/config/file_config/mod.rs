//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod behavior;
mod ocr;
mod output;
mod providers;

pub use behavior::FileBehaviorConfig;
pub use ocr::FileOcrConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, ProviderKind, default_providers};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use triplecheck_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Answer providers, in registration order
    pub providers: Vec<FileProviderConfig>,
    /// OCR settings
    pub ocr: FileOcrConfig,
    /// Timeouts
    pub behavior: FileBehaviorConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            ocr: FileOcrConfig::default(),
            behavior: FileBehaviorConfig::default(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Enabled providers, in registration order
    pub fn enabled_providers(&self) -> impl Iterator<Item = &FileProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// It checks:
    /// 1. Provider entries (ids, kinds, model names)
    /// 2. At least one enabled provider
    /// 3. Zero timeouts
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Provider entries
        let mut seen = HashSet::new();
        for provider in &self.providers {
            let id = provider.id.trim();
            if id.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyProviderId,
                    "providers: entry with an empty id",
                ));
                continue;
            }

            if !seen.insert(id) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateProviderId { id: id.to_string() },
                    format!("providers: id '{}' is used more than once", id),
                ));
            }

            if provider.kind().is_none() {
                let valid: Vec<_> = ProviderKind::ALL.iter().map(|k| k.as_str()).collect();
                let code = ConfigIssueCode::UnknownProviderKind {
                    id: id.to_string(),
                    kind: provider.kind.clone(),
                };
                let message = format!(
                    "providers.{}: unknown kind '{}' (expected one of: {})",
                    id,
                    provider.kind,
                    valid.join(", ")
                );
                // A disabled entry never reaches the factory
                issues.push(if provider.enabled {
                    ConfigIssue::error(code, message)
                } else {
                    ConfigIssue::warning(code, message)
                });
            }

            if provider.model.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName { id: id.to_string() },
                    format!("providers.{}: model name cannot be empty", id),
                ));
            }
        }

        // 2. Something to ask
        if self.enabled_providers().next().is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoProviders,
                "no enabled providers configured",
            ));
        }

        // 3. Timeouts
        if self.behavior.request_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout {
                    field: "behavior.request_timeout_secs".to_string(),
                },
                "behavior.request_timeout_secs cannot be 0",
            ));
        }
        if self.behavior.round_timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroTimeout {
                    field: "behavior.round_timeout_secs".to_string(),
                },
                "behavior.round_timeout_secs is 0; every round would expire immediately, ignoring it",
            ));
        }

        issues
    }

    /// Behavior config with invalid values dropped
    pub fn behavior_config(&self) -> triplecheck_application::BehaviorConfig {
        let mut file = self.behavior.clone();
        if file.round_timeout_secs == Some(0) {
            file.round_timeout_secs = None;
        }
        file.to_behavior_config()
    }
}
