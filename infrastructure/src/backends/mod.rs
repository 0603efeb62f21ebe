//! Answer backends and provider construction
//!
//! Each configured provider becomes a [`TimedProvider`] wrapping the backend
//! for its kind:
//!
//! | kind         | backend                    | short-line cleanup |
//! |--------------|----------------------------|--------------------|
//! | `openai`     | [`ChatCompletionsBackend`] | no                 |
//! | `perplexity` | [`ChatCompletionsBackend`] | no                 |
//! | `gemini`     | [`GeminiBackend`]          | yes                |

mod chat_completions;
mod gemini;
pub(crate) mod http;

pub use chat_completions::ChatCompletionsBackend;
pub use gemini::GeminiBackend;

use crate::config::{FileConfig, FileProviderConfig, ProviderKind};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use triplecheck_application::{AnswerProvider, BehaviorConfig, TimedProvider};

/// Errors that prevent building the provider set
#[derive(Error, Debug)]
pub enum ProviderSetupError {
    #[error("Unknown provider '{0}' (see --show-config for configured providers)")]
    UnknownProvider(String),

    #[error("Provider '{id}' has unknown kind '{kind}'")]
    UnknownKind { id: String, kind: String },

    #[error("Provider '{id}' has no API key (set {env} or api_key in the config file)")]
    MissingApiKey { id: String, env: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Build the ordered provider set.
///
/// With an empty `only` list every enabled provider is used. Otherwise the
/// named providers are used in configuration order, enabled or not.
pub fn build_providers(
    config: &FileConfig,
    behavior: &BehaviorConfig,
    only: &[String],
) -> Result<Vec<Arc<dyn AnswerProvider>>, ProviderSetupError> {
    if let Some(unknown) = only
        .iter()
        .find(|id| !config.providers.iter().any(|p| &p.id == *id))
    {
        return Err(ProviderSetupError::UnknownProvider(unknown.clone()));
    }

    let client = http::build_client(behavior.request_timeout)?;

    config
        .providers
        .iter()
        .filter(|p| {
            if only.is_empty() {
                p.enabled
            } else {
                only.contains(&p.id)
            }
        })
        .map(|p| build_provider(p, client.clone()))
        .collect()
}

fn build_provider(
    provider: &FileProviderConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn AnswerProvider>, ProviderSetupError> {
    let kind = provider
        .kind()
        .ok_or_else(|| ProviderSetupError::UnknownKind {
            id: provider.id.clone(),
            kind: provider.kind.clone(),
        })?;

    let api_key = provider
        .resolve_api_key()
        .ok_or_else(|| ProviderSetupError::MissingApiKey {
            id: provider.id.clone(),
            env: provider.api_key_env.clone(),
        })?;

    let base_url = provider
        .resolved_base_url()
        .unwrap_or_else(|| kind.default_base_url().to_string());

    debug!(
        "Registering provider {} ({} {}, {})",
        provider.id, kind, provider.model, base_url
    );

    let id = provider.id.as_str();
    let label = provider.display_label();

    let answer_provider: Arc<dyn AnswerProvider> = match kind {
        ProviderKind::OpenAi | ProviderKind::Perplexity => {
            let backend = ChatCompletionsBackend::new(client, &base_url, api_key, &provider.model)
                .with_max_tokens(provider.max_tokens)
                .with_temperature(provider.temperature);
            Arc::new(TimedProvider::new(id, label, backend))
        }
        ProviderKind::Gemini => {
            let backend = GeminiBackend::new(client, &base_url, api_key, &provider.model)
                .with_temperature(provider.temperature);
            Arc::new(TimedProvider::new(id, label, backend))
        }
    };
    Ok(answer_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triplecheck_domain::ProviderId;

    fn config_with_keys() -> FileConfig {
        let mut config = FileConfig::default();
        for provider in &mut config.providers {
            provider.api_key = Some(format!("key-{}", provider.id));
        }
        config
    }

    #[test]
    fn test_builds_enabled_providers_in_order() {
        let mut config = config_with_keys();
        config.providers[1].enabled = false;

        let providers = build_providers(&config, &BehaviorConfig::default(), &[]).unwrap();
        let ids: Vec<_> = providers.iter().map(|p| p.id().clone()).collect();
        assert_eq!(ids, vec![ProviderId::new("gpt4"), ProviderId::new("sonar")]);
        assert_eq!(providers[0].label(), "GPT-4 Turbo");
    }

    #[test]
    fn test_filter_selects_subset() {
        let config = config_with_keys();
        let only = vec!["sonar_pro".to_string()];

        let providers = build_providers(&config, &BehaviorConfig::default(), &only).unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id().as_str(), "sonar_pro");
    }

    #[test]
    fn test_filter_with_unknown_id() {
        let config = config_with_keys();
        let only = vec!["claude".to_string()];

        let result = build_providers(&config, &BehaviorConfig::default(), &only);
        assert!(matches!(result, Err(ProviderSetupError::UnknownProvider(id)) if id == "claude"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = FileConfig::default();
        config.providers.truncate(1);
        config.providers[0].api_key_env = "TRIPLECHECK_TEST_UNSET_VARIABLE".to_string();

        let result = build_providers(&config, &BehaviorConfig::default(), &[]);
        assert!(matches!(
            result,
            Err(ProviderSetupError::MissingApiKey { id, .. }) if id == "gpt4"
        ));
    }

    #[test]
    fn test_gemini_kind() {
        let mut config = FileConfig::default();
        config.providers = vec![FileProviderConfig {
            id: "flash".to_string(),
            kind: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: Some("key".to_string()),
            ..Default::default()
        }];

        let providers = build_providers(&config, &BehaviorConfig::default(), &[]).unwrap();
        assert_eq!(providers[0].label(), "flash");
    }
}
