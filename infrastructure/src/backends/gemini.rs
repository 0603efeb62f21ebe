//! Google Gemini backend with search grounding

use super::http;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use triplecheck_application::{AnswerBackend, BackendError};
use triplecheck_domain::AnswerPromptTemplate;

/// Default sampling temperature for focused answers
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    tools: Vec<serde_json::Value>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini `generateContent` client for one model
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

impl GeminiBackend {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: &str,
    ) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature.unwrap_or(DEFAULT_TEMPERATURE);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, question: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(AnswerPromptTemplate::grounded_query(question)),
                }],
            }],
            tools: vec![json!({ "google_search": {} })],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    fn http_request(&self, question: &str) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header(http::GOOG_API_KEY_HEADER, self.api_key.as_str())
            .json(&self.build_request(question))
    }
}

#[async_trait]
impl AnswerBackend for GeminiBackend {
    async fn request(&self, question: &str) -> Result<String, BackendError> {
        debug!("POST {}", self.endpoint);

        let response = self
            .http_request(question)
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::ensure_success(response).await?;
        let body: GenerateResponse = http::decode_json(response).await?;

        extract_text(body)
    }

    fn cleans_short_answer(&self) -> bool {
        true
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(body: GenerateResponse) -> Result<String, BackendError> {
    let content = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| BackendError::MalformedResponse("no candidates".to_string()))?;

    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(BackendError::MalformedResponse(
            "candidate has no text".to_string(),
        ));
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use triplecheck_application::{AnswerProvider, TimedProvider};

    #[test]
    fn test_endpoint() {
        let backend = GeminiBackend::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com",
            "key",
            "gemini-2.0-flash",
        );
        assert_eq!(
            backend.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let backend = GeminiBackend::new(reqwest::Client::new(), "http://x", "key", "m");
        let json = serde_json::to_value(backend.build_request("Which rate?")).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Question: Which rate?"));
        assert!(json["tools"][0].get("google_search").is_some());
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"The answer"},{"text":" is\nC"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "The answer is\nC");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(body),
            Err(BackendError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_api_key_sent_as_header() {
        let backend = GeminiBackend::new(reqwest::Client::new(), "http://x", "SECRET_KEY_123", "m");
        let request = backend.http_request("Which rate?").build().unwrap();

        assert!(request.url().query().is_none());
        assert_eq!(
            request.headers()[http::GOOG_API_KEY_HEADER],
            "SECRET_KEY_123"
        );
    }

    #[tokio::test]
    async fn test_failure_text_does_not_leak_api_key() {
        let client = http::build_client(Some(Duration::from_secs(5))).unwrap();
        let backend = GeminiBackend::new(client, "http://127.0.0.1:9", "SECRET_KEY_123", "m");
        let provider = TimedProvider::new("flash", "Gemini", backend);

        let result = provider.answer("Which rate?").await;
        assert!(!result.success);
        assert!(result.text.starts_with("Failed to process with Gemini"));
        assert!(!result.text.contains("SECRET_KEY_123"), "{}", result.text);
    }
}
