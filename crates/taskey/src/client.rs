//! Taskey web API client.

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

use crate::credentials::{CredentialSource, Credentials};
use crate::error::TaskeyError;
use crate::fields::{build_body, build_test_body, RecordParams};
use crate::operation::Operation;
use crate::transport::{form_headers, HttpTransport, Transport};

/// Header used by the generic authentication path.
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the Taskey `/webapi/` scripts.
///
/// Credentials are resolved on every call, so rotating them in the
/// underlying source takes effect on the next record.
#[derive(Clone)]
pub struct TaskeyClient {
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn Transport>,
    base_url: Option<String>,
}

impl TaskeyClient {
    /// Create a client that talks HTTP via `reqwest`.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self::with_transport(credentials, Arc::new(HttpTransport::new()))
    }

    /// Create a client with a custom transport.
    #[must_use]
    pub fn with_transport(
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            base_url: None,
        }
    }

    /// Send requests to `base_url` instead of `https://{subdomain}.taskey.co.il`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Full URL of an operation's script.
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the base URL does not parse.
    pub fn endpoint_url(
        &self,
        credentials: &Credentials,
        operation: Operation,
    ) -> Result<String, TaskeyError> {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| credentials.base_url());
        let url = Url::parse(&format!(
            "{}/webapi/{}",
            base.trim_end_matches('/'),
            operation.endpoint()
        ))?;
        Ok(url.into())
    }

    /// Send one record to Taskey and return the decoded reply.
    ///
    /// # Errors
    /// Returns error if credentials cannot be resolved or the request fails.
    #[instrument(skip(self, operation, params), fields(operation = %operation))]
    pub async fn send(
        &self,
        operation: Operation,
        params: &RecordParams,
    ) -> Result<Value, TaskeyError> {
        let credentials = self.credentials.resolve().await?;
        let url = self.endpoint_url(&credentials, operation)?;
        let body = build_body(operation, &credentials, params);

        debug!(url = %url, source = self.credentials.name(), "Sending Taskey record");

        self.transport.post(&url, form_headers(), body).await
    }

    /// Send `test=1` to the lead script to check the stored credentials.
    ///
    /// # Errors
    /// Returns error if the credentials are rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn verify_credentials(&self) -> Result<Value, TaskeyError> {
        let credentials = self.credentials.resolve().await?;
        let url = self.endpoint_url(&credentials, Operation::AddLead)?;

        let mut headers = form_headers();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&format!("Bearer {}", credentials.api_key)).map_err(|_| {
                TaskeyError::CredentialResolution(
                    "API key contains characters not allowed in a header".to_string(),
                )
            })?,
        );

        debug!(url = %url, transport = self.transport.name(), "Verifying Taskey credentials");

        self.transport
            .post(&url, headers, build_test_body(&credentials))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;

    fn client() -> TaskeyClient {
        let creds = Credentials::new("acme", "secret").unwrap();
        TaskeyClient::new(Arc::new(StaticCredentials::new(creds)))
    }

    #[test]
    fn test_endpoint_url_from_subdomain() {
        let creds = Credentials::new("acme", "secret").unwrap();
        assert_eq!(
            client().endpoint_url(&creds, Operation::AddTask).unwrap(),
            "https://acme.taskey.co.il/webapi/AddTask.php"
        );
    }

    #[test]
    fn test_endpoint_url_with_base_override() {
        let creds = Credentials::new("acme", "secret").unwrap();
        let client = client().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(
            client.endpoint_url(&creds, Operation::AddMeeting).unwrap(),
            "http://127.0.0.1:8080/webapi/AddMeeting.php"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_bad_subdomain() {
        let creds = Credentials::new("bad host", "secret").unwrap();
        assert!(matches!(
            client().endpoint_url(&creds, Operation::AddLead),
            Err(TaskeyError::InvalidUrl(_))
        ));
    }
}
