//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.pipedrive.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const TOKEN_ENV: &str = "PIPEDRIVE_API_TOKEN";
pub const BASE_URL_ENV: &str = "PIPEDRIVE_BASE_URL";

/// Account credentials and connection settings.
///
/// The token is sent as the `x-api-token` header to V2 endpoints and as the
/// `api_token` query parameter to V1 endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("pipedrive-rs/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Read the token, and optionally the base URL, from the environment.
    pub fn from_env() -> Result<Self, Error> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| Error::Config {
            message: format!("{} is not set", TOKEN_ENV),
        })?;
        if token.trim().is_empty() {
            return Err(Error::Config {
                message: format!("{} is empty", TOKEN_ENV),
            });
        }

        let mut config = Self::new(token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
