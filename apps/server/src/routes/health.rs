//! # Health
//!
//! Liveness plus the offline-mode flag. A UI shows a banner whenever
//! `connected` is false, since saves then only live until restart.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// False when serving the in-memory demo store.
    pub connected: bool,
    /// `sqlite` or `memory`.
    pub backend: &'static str,
    /// Result of a live database probe. Absent in offline mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_ok: Option<bool>,
    /// Whether a notification token is configured.
    pub notifier_configured: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let database_ok = match state.database() {
        Some(db) => Some(db.health_check().await),
        None => None,
    };
    debug!(connected = state.connected(), ?database_ok, "health check");

    Json(HealthResponse {
        status: "ok",
        connected: state.connected(),
        backend: state.store().backend(),
        database_ok,
        notifier_configured: state.notifier().is_configured(),
    })
}
