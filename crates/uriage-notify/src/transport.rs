//! # Transport
//!
//! The single outbound HTTP call, behind a trait so the dispatcher can be
//! tested without a network.
//!
//! ```text
//! Notifier ──► dyn Transport ──┬── ReqwestTransport (production)
//!                              └── test doubles (fixed status / error)
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use crate::error::NotifyError;

/// Status and body of whatever the endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON POST with a bearer credential.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Any HTTP status is `Ok`; only failures to get a response are `Err`.
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<TransportResponse, NotifyError>;
}

/// Production transport on a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<TransportResponse, NotifyError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status, error = %err, "Broadcast response body unreadable");
                String::new()
            }
        };

        Ok(TransportResponse { status, body })
    }
}
