//! Provider configuration from TOML (`[[providers]]` list)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Backend protocol a provider speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI chat completions
    OpenAi,
    /// Perplexity chat completions (OpenAI-compatible)
    Perplexity,
    /// Google Gemini generateContent with search grounding
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Perplexity, Self::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Perplexity => "perplexity",
            Self::Gemini => "gemini",
        }
    }

    /// Default API base URL for this kind
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Perplexity => "https://api.perplexity.ai",
            Self::Gemini => "https://generativelanguage.googleapis.com",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "perplexity" => Ok(Self::Perplexity),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown provider kind: {}", other)),
        }
    }
}

/// One answer provider entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Stable identifier used by `--provider` and in JSON output
    pub id: String,
    /// Display name; falls back to `id` when empty
    pub label: String,
    /// Backend kind: "openai", "perplexity" or "gemini"
    pub kind: String,
    /// Model name sent to the backend
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead)
    pub api_key: Option<String>,
    /// Override for the kind's default base URL
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub enabled: bool,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            kind: "openai".to_string(),
            model: String::new(),
            api_key_env: String::new(),
            api_key: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
            enabled: true,
        }
    }
}

impl FileProviderConfig {
    /// Parsed backend kind, `None` when unrecognized
    pub fn kind(&self) -> Option<ProviderKind> {
        self.kind.parse().ok()
    }

    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Base URL with trailing slashes removed
    pub fn resolved_base_url(&self) -> Option<String> {
        let base = match &self.base_url {
            Some(url) => url.clone(),
            None => self.kind()?.default_base_url().to_string(),
        };
        Some(base.trim_end_matches('/').to_string())
    }

    /// Resolve the API key: direct value first, then the configured env var
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                if self.api_key_env.is_empty() {
                    None
                } else {
                    std::env::var(&self.api_key_env).ok()
                }
            })
            .filter(|k| !k.trim().is_empty())
    }
}

/// The built-in provider list: one OpenAI model and two Perplexity models
pub fn default_providers() -> Vec<FileProviderConfig> {
    vec![
        FileProviderConfig {
            id: "gpt4".to_string(),
            label: "GPT-4 Turbo".to_string(),
            kind: "openai".to_string(),
            model: "gpt-4-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: Some(100),
            ..Default::default()
        },
        FileProviderConfig {
            id: "sonar_pro".to_string(),
            label: "Perplexity sonar-pro".to_string(),
            kind: "perplexity".to_string(),
            model: "sonar-pro".to_string(),
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
            ..Default::default()
        },
        FileProviderConfig {
            id: "sonar".to_string(),
            label: "Perplexity sonar".to_string(),
            kind: "perplexity".to_string(),
            model: "sonar".to_string(),
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
            ..Default::default()
        },
    ]
}
