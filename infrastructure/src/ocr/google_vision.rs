//! Google Cloud Vision text detection
//!
//! Sends the image as base64 to `images:annotate` with `TEXT_DETECTION` and
//! returns the first (full-text) annotation.

use crate::backends::http;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use triplecheck_application::{BackendError, TextExtractor};

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}

/// Vision API client
pub struct GoogleVisionOcr {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleVisionOcr {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http::build_client(timeout)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    fn build_request(image: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![ImageRequest {
                image: Image {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }

    async fn annotate(&self, image: &[u8]) -> Result<AnnotateResponse, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(http::GOOG_API_KEY_HEADER, self.api_key.as_str())
            .json(&Self::build_request(image))
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::ensure_success(response).await?;
        http::decode_json(response).await
    }
}

#[async_trait]
impl TextExtractor for GoogleVisionOcr {
    async fn extract_text(&self, image: &[u8]) -> Option<String> {
        debug!("Extracting text from {} byte image", image.len());

        let response = match self.annotate(image).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Text extraction failed: {}", e);
                return None;
            }
        };

        let text = first_annotation(response)?;
        info!("Extracted {} characters of text", text.len());
        Some(text)
    }
}

/// Full-text annotation of the first image, if any text was detected
fn first_annotation(response: AnnotateResponse) -> Option<String> {
    let image = response.responses.into_iter().next()?;

    if let Some(error) = image.error {
        warn!("Vision API error: {}", error.message);
        return None;
    }

    let text = image.text_annotations.into_iter().next()?.description;
    let text = text.trim();
    if text.is_empty() {
        debug!("No text detected");
        None
    } else {
        Some(text.to_string())
    }
}
