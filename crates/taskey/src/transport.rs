//! Outbound HTTP transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TaskeyError;

/// Content type of every Taskey request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Performs a single POST and returns the decoded reply.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Get the name of this transport.
    fn name(&self) -> &'static str;

    /// POST `body` to `url` with the given headers.
    async fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<Value, TaskeyError>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, custom TLS roots).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> Result<Value, TaskeyError> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = %status, body = %text, "Taskey request failed");
            return Err(TaskeyError::Status { status, body: text });
        }

        debug!(status = %status, bytes = text.len(), "Taskey request succeeded");

        Ok(decode_response(text))
    }
}

/// Headers for a form POST.
#[must_use]
pub fn form_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
    headers
}

/// JSON replies are returned parsed, anything else as a JSON string.
fn decode_response(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
