//! OCR configuration from TOML (`[ocr]` section)

use serde::{Deserialize, Serialize};

/// Raw OCR configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOcrConfig {
    /// Environment variable holding the Google Vision API key
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead)
    pub api_key: Option<String>,
    /// Vision `images:annotate` endpoint
    pub endpoint: String,
}

impl Default for FileOcrConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_VISION_API_KEY".to_string(),
            api_key: None,
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
        }
    }
}

impl FileOcrConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
