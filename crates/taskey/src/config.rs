//! Configuration for the Taskey adapter.

use async_trait::async_trait;
use std::env;

use crate::credentials::{CredentialSource, Credentials, ENV_TASKEY_API_KEY, ENV_TASKEY_SUBDOMAIN};
use crate::error::TaskeyError;

/// Environment variable overriding the derived base URL.
pub const ENV_TASKEY_BASE_URL: &str = "TASKEY_BASE_URL";

/// Environment variable enabling continue-on-fail for batches.
pub const ENV_TASKEY_CONTINUE_ON_FAIL: &str = "TASKEY_CONTINUE_ON_FAIL";

/// Taskey adapter configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Account subdomain.
    pub subdomain: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Base URL override (self-hosted or test servers).
    pub base_url: Option<String>,
    /// Emit error records instead of aborting a batch.
    pub continue_on_fail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subdomain: env::var(ENV_TASKEY_SUBDOMAIN).ok().filter(|s| !s.is_empty()),
            api_key: env::var(ENV_TASKEY_API_KEY).ok().filter(|s| !s.is_empty()),
            base_url: env::var(ENV_TASKEY_BASE_URL).ok().filter(|s| !s.is_empty()),
            continue_on_fail: env::var(ENV_TASKEY_CONTINUE_ON_FAIL)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Credentials from the configured subdomain and API key.
    ///
    /// # Errors
    /// Returns `CredentialResolution` if either value is missing.
    pub fn credentials(&self) -> Result<Credentials, TaskeyError> {
        let subdomain = self.subdomain.clone().ok_or_else(|| {
            TaskeyError::CredentialResolution(format!("{ENV_TASKEY_SUBDOMAIN} not set"))
        })?;
        let api_key = self.api_key.clone().ok_or_else(|| {
            TaskeyError::CredentialResolution(format!("{ENV_TASKEY_API_KEY} not set"))
        })?;
        Credentials::new(subdomain, api_key)
    }
}

#[async_trait]
impl CredentialSource for Config {
    fn name(&self) -> &'static str {
        "config"
    }

    async fn resolve(&self) -> Result<Credentials, TaskeyError> {
        self.credentials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::EnvCredentials;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var(ENV_TASKEY_SUBDOMAIN);
        env::remove_var(ENV_TASKEY_API_KEY);
        env::remove_var(ENV_TASKEY_BASE_URL);
        env::remove_var(ENV_TASKEY_CONTINUE_ON_FAIL);
    }

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert!(config.subdomain.is_none());
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
        assert!(!config.continue_on_fail);
        assert!(matches!(
            config.credentials(),
            Err(TaskeyError::CredentialResolution(_))
        ));
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var(ENV_TASKEY_SUBDOMAIN, "acme");
        env::set_var(ENV_TASKEY_API_KEY, "secret");
        env::set_var(ENV_TASKEY_BASE_URL, "http://localhost:9000");
        env::set_var(ENV_TASKEY_CONTINUE_ON_FAIL, "TRUE");

        let config = Config::default();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert!(config.continue_on_fail);

        let creds = config.credentials().unwrap();
        assert_eq!(creds.subdomain, "acme");
        assert_eq!(creds.api_key, "secret");

        clear_env();
    }

    #[test]
    fn test_env_credentials_load() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let missing = EnvCredentials::load();
        assert!(matches!(missing, Err(TaskeyError::CredentialResolution(_))));

        env::set_var(ENV_TASKEY_SUBDOMAIN, "acme");
        env::set_var(ENV_TASKEY_API_KEY, "secret");
        let creds = EnvCredentials::load();
        clear_env();

        assert_eq!(creds.unwrap().base_url(), "https://acme.taskey.co.il");
    }

    #[tokio::test]
    async fn test_config_resolves_on_each_call() {
        let mut config = Config {
            subdomain: None,
            api_key: None,
            base_url: None,
            continue_on_fail: false,
        };
        assert!(matches!(
            config.resolve().await,
            Err(TaskeyError::CredentialResolution(_))
        ));

        config.subdomain = Some("acme".to_string());
        config.api_key = Some("secret".to_string());
        let creds = config.resolve().await.unwrap();
        assert_eq!(creds.subdomain, "acme");
        assert_eq!(creds.api_key, "secret");
    }
}
