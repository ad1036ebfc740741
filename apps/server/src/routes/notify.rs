//! # Manual Notification
//!
//! Lets an operator resend a message after a failed save notification.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uriage_notify::NotifyOutcome;

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub message: String,
}

pub async fn send_message(
    State(state): State<SharedState>,
    Json(request): Json<NotifyRequest>,
) -> ApiResult<Json<NotifyOutcome>> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation("message is required"));
    }
    Ok(Json(state.notifier().notify(&request.message).await))
}
