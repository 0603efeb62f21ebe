//! OpenAI-compatible chat completions backend
//!
//! Serves both OpenAI and Perplexity, which share the
//! `POST {base_url}/chat/completions` request/response shape.

use super::http;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triplecheck_application::{AnswerBackend, BackendError};
use triplecheck_domain::AnswerPromptTemplate;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat completions client for one model
pub struct ChatCompletionsBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl ChatCompletionsBackend {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, question: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: AnswerPromptTemplate::system().into(),
                },
                ChatMessage {
                    role: "user",
                    content: AnswerPromptTemplate::answer_query(question).into(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl AnswerBackend for ChatCompletionsBackend {
    async fn request(&self, question: &str) -> Result<String, BackendError> {
        debug!("POST {} (model: {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(question))
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::ensure_success(response).await?;
        let body: ChatResponse = http::decode_json(response).await?;

        extract_content(body)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, BackendError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            BackendError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ChatCompletionsBackend {
        ChatCompletionsBackend::new(
            reqwest::Client::new(),
            "https://api.perplexity.ai/",
            "key",
            "sonar-pro",
        )
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            backend().endpoint(),
            "https://api.perplexity.ai/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let backend = backend().with_max_tokens(Some(100));
        let json = serde_json::to_value(backend.build_request("What is 2+2?")).unwrap();

        assert_eq!(json["model"], "sonar-pro");
        assert_eq!(json["max_tokens"], 100);
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        let user = json["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("What is 2+2?"));
        assert!(user.contains("value only"));
    }

    #[test]
    fn test_extract_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" B \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "B");
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(body),
            Err(BackendError::MalformedResponse(_))
        ));
    }
}
