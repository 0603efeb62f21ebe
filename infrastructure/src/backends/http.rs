//! Shared HTTP plumbing for backends

use std::time::Duration;
use triplecheck_application::BackendError;
use triplecheck_domain::core::string::truncate;

/// Maximum length of an error body carried into a failure message
const MAX_ERROR_BODY: usize = 200;

pub(crate) const USER_AGENT: &str = concat!("triple-check/", env!("CARGO_PKG_VERSION"));

/// Header carrying the key for Google APIs; the URL must stay credential-free
pub(crate) const GOOG_API_KEY_HEADER: &str = "x-goog-api-key";

/// Build a client with the configured request timeout
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Error texts end up in failure messages, so the request URL is stripped
pub(crate) fn send_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.without_url().to_string())
    }
}

/// Turn a non-2xx response into [`BackendError::Status`]
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body: truncate(body.trim(), MAX_ERROR_BODY),
    })
}

/// Decode a JSON body, mapping failures to [`BackendError::MalformedResponse`]
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::MalformedResponse(e.without_url().to_string()))
}
