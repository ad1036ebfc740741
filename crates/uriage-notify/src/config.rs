//! Notification endpoint configuration.
//!
//! Loaded from environment variables with fallback to defaults. The access
//! token has no default: without it the dispatcher reports a failure
//! instead of sending.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::NotifyError;

/// Broadcast API of the LINE Messaging API.
pub const DEFAULT_ENDPOINT: &str = "https://api.line.me/v2/bot/message/broadcast";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to send notifications.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Broadcast endpoint URL.
    pub endpoint: String,

    /// Channel access token sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl NotifyConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                     | Default               |
    /// |------------------------------|-----------------------|
    /// | `URIAGE_LINE_ENDPOINT`       | [`DEFAULT_ENDPOINT`]  |
    /// | `URIAGE_LINE_TOKEN`          | none                  |
    /// | `URIAGE_NOTIFY_TIMEOUT_SECS` | 10                    |
    pub fn from_env() -> Result<Self, NotifyError> {
        let mut config = NotifyConfig::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides fields that have a matching environment variable set.
    pub fn apply_env(&mut self) -> Result<(), NotifyError> {
        if let Ok(endpoint) = env::var("URIAGE_LINE_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Ok(token) = env::var("URIAGE_LINE_TOKEN") {
            self.token = Some(token);
        }

        if let Ok(secs) = env::var("URIAGE_NOTIFY_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .parse()
                .map_err(|_| NotifyError::InvalidConfig("URIAGE_NOTIFY_TIMEOUT_SECS".to_string()))?;
        }

        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The token, if one is configured and not blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Token never appears in logs
impl fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotifyConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.token().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let config = NotifyConfig::default().with_token("   ");
        assert!(config.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = NotifyConfig::default().with_token("very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
