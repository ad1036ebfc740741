//! # Notification Dispatcher
//!
//! ## Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  notify(message)                                                        │
//! │     │                                                                   │
//! │     ├── no token configured ──────────► success=false, no request      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  POST {"messages":[{"type":"text","text":message}]}                    │
//! │  Authorization: Bearer <token>                                          │
//! │     │                                                                   │
//! │     ├── 2xx ──────────────────────────► success=true                   │
//! │     ├── other status ─────────────────► success=false, body as detail  │
//! │     └── transport error ──────────────► success=false, "server error"  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one attempt per call. There is no retry, backoff or idempotency
//! key; a caller that wants another try calls `notify` again.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::NotifyConfig;
use crate::error::NotifyError;
use crate::transport::{ReqwestTransport, Transport};

/// Message reported when the request never got a response.
pub const SERVER_ERROR_MESSAGE: &str = "server error";

/// Message reported when no access token is configured.
pub const MISSING_TOKEN_MESSAGE: &str = "アクセストークン未設定";

const SUCCESS_MESSAGE: &str = "LINE通知成功 ✅";

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOutcome {
    pub success: bool,
    pub message: String,
    /// HTTP status returned by the endpoint, when one was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl NotifyOutcome {
    fn sent(status: u16) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            status: Some(status),
        }
    }

    fn failed(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status,
        }
    }
}

/// Sends text messages to the configured broadcast endpoint.
#[derive(Clone)]
pub struct Notifier {
    config: NotifyConfig,
    transport: Arc<dyn Transport>,
}

impl Notifier {
    /// Creates a notifier using the production HTTP transport.
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: NotifyConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Whether a token is present. Without one every `notify` fails fast.
    pub fn is_configured(&self) -> bool {
        self.config.token().is_some()
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// Posts `message` once and reports what happened.
    pub async fn notify(&self, message: &str) -> NotifyOutcome {
        let Some(token) = self.config.token() else {
            warn!("Notification skipped: URIAGE_LINE_TOKEN is not set");
            return NotifyOutcome::failed(MISSING_TOKEN_MESSAGE, None);
        };

        let body = json!({
            "messages": [{ "type": "text", "text": message }]
        });

        match self
            .transport
            .post_json(&self.config.endpoint, token, &body)
            .await
        {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "Notification sent");
                NotifyOutcome::sent(response.status)
            }
            Ok(response) => {
                let detail = response.body.trim();
                warn!(status = response.status, body = %detail, "Notification rejected by endpoint");
                NotifyOutcome::failed(
                    format!("LINE送信失敗 (HTTP {}): {}", response.status, detail),
                    Some(response.status),
                )
            }
            Err(err) => {
                error!(error = %err, endpoint = %self.config.endpoint, "Notification transport failed");
                NotifyOutcome::failed(SERVER_ERROR_MESSAGE, None)
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Answers every request with a fixed result and remembers what it got.
    struct MockTransport {
        reply: Result<TransportResponse, ()>,
        calls: Mutex<Vec<(String, String, Value)>>,
    }

    impl MockTransport {
        fn status(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(TransportResponse {
                    status,
                    body: body.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(
            &self,
            url: &str,
            bearer: &str,
            body: &Value,
        ) -> Result<TransportResponse, NotifyError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), bearer.to_string(), body.clone()));
            self.reply
                .clone()
                .map_err(|_| NotifyError::Transport("connection refused".to_string()))
        }
    }

    fn configured() -> NotifyConfig {
        NotifyConfig::default()
            .with_endpoint("http://broadcast.test/v2/bot/message/broadcast")
            .with_token("test-token")
    }

    #[tokio::test]
    async fn test_success_on_200() {
        let transport = MockTransport::status(200, "{}");
        let notifier = Notifier::with_transport(configured(), transport.clone());

        let outcome = notifier.notify("こんにちは").await;
        assert!(outcome.success);
        assert_eq!(outcome.status, Some(200));

        let calls = transport.calls.lock().unwrap();
        let (url, bearer, body) = &calls[0];
        assert_eq!(url, "http://broadcast.test/v2/bot/message/broadcast");
        assert_eq!(bearer, "test-token");
        assert_eq!(
            body,
            &json!({"messages": [{"type": "text", "text": "こんにちは"}]})
        );
    }

    #[tokio::test]
    async fn test_failure_on_500_surfaces_body() {
        let transport = MockTransport::status(500, "upstream exploded");
        let notifier = Notifier::with_transport(configured(), transport.clone());

        let outcome = notifier.notify("x").await;
        assert!(!outcome.success);
        assert_eq!(outcome.status, Some(500));
        assert!(outcome.message.contains("upstream exploded"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_server_error() {
        let transport = MockTransport::broken();
        let notifier = Notifier::with_transport(configured(), transport.clone());

        let outcome = notifier.notify("x").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, SERVER_ERROR_MESSAGE);
        assert_eq!(outcome.status, None);
        // single attempt, no retry
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_call() {
        let transport = MockTransport::status(200, "{}");
        let notifier = Notifier::with_transport(NotifyConfig::default(), transport.clone());

        assert!(!notifier.is_configured());
        let outcome = notifier.notify("x").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, MISSING_TOKEN_MESSAGE);
        assert_eq!(transport.call_count(), 0);
    }
}
