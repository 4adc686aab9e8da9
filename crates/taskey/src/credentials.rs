//! Taskey account credentials and where they come from.

use async_trait::async_trait;
use std::fmt;
use tracing::debug;

use crate::error::TaskeyError;

/// Environment variable for the account subdomain.
pub const ENV_TASKEY_SUBDOMAIN: &str = "TASKEY_SUBDOMAIN";

/// Environment variable for the API key.
pub const ENV_TASKEY_API_KEY: &str = "TASKEY_API_KEY";

/// Subdomain and API key for one Taskey account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub subdomain: String,
    pub api_key: String,
}

impl Credentials {
    /// Create credentials, rejecting blank values.
    ///
    /// # Errors
    /// Returns `CredentialResolution` if either value is empty.
    pub fn new(
        subdomain: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, TaskeyError> {
        let subdomain = subdomain.into().trim().to_string();
        let api_key = api_key.into();

        if subdomain.is_empty() {
            return Err(TaskeyError::CredentialResolution("subdomain is empty".to_string()));
        }
        if api_key.is_empty() {
            return Err(TaskeyError::CredentialResolution("API key is empty".to_string()));
        }

        Ok(Self { subdomain, api_key })
    }

    /// Account base URL, `https://{subdomain}.taskey.co.il`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}.taskey.co.il", self.subdomain)
    }
}

// Keep the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("subdomain", &self.subdomain)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Source of credentials, consulted once per record.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Get the name of this source.
    fn name(&self) -> &'static str;

    /// Resolve the credentials to use for the next request.
    async fn resolve(&self) -> Result<Credentials, TaskeyError>;
}

/// Fixed credentials supplied by the caller.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self) -> Result<Credentials, TaskeyError> {
        Ok(self.credentials.clone())
    }
}

/// Credentials read from `TASKEY_SUBDOMAIN` and `TASKEY_API_KEY` at resolve time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Read the credentials from the environment now.
    ///
    /// # Errors
    /// Returns `CredentialResolution` if either variable is unset or empty.
    pub fn load() -> Result<Credentials, TaskeyError> {
        let subdomain = std::env::var(ENV_TASKEY_SUBDOMAIN).map_err(|_| {
            TaskeyError::CredentialResolution(format!("{ENV_TASKEY_SUBDOMAIN} not set"))
        })?;
        let api_key = std::env::var(ENV_TASKEY_API_KEY).map_err(|_| {
            TaskeyError::CredentialResolution(format!("{ENV_TASKEY_API_KEY} not set"))
        })?;

        debug!(subdomain = %subdomain, "Resolved Taskey credentials from environment");

        Credentials::new(subdomain, api_key)
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    fn name(&self) -> &'static str {
        "env"
    }

    async fn resolve(&self) -> Result<Credentials, TaskeyError> {
        Self::load()
    }
}
