//! # Sales Handlers
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sales  { date, recorder, quantities, workTimes, taxRate? }   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  DailyEntry::into_record(catalog)      400 on invalid / empty entry     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  store.append(record)                  id assigned by the store         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  notifier.notify(text)                 outcome reported, never fatal    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  201 { record, connected, notification }                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uriage_core::entry::DailyEntry;
use uriage_core::summary::save_notification_text;
use uriage_core::validation::validate_record;
use uriage_core::SalesRecord;
use uriage_db::{SortDirection, SortField};
use uriage_notify::NotifyOutcome;

use crate::error::ApiResult;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

/// Lists every record, ascending by date unless `?direction=desc`.
pub async fn list_sales(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SalesRecord>>> {
    let direction = query.direction.unwrap_or(SortDirection::Asc);
    let records = state
        .store()
        .list_ordered_by(SortField::Date, direction)
        .await?;
    Ok(Json(records))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub record: SalesRecord,
    /// False when the record went to the in-memory fallback store.
    pub connected: bool,
    /// Absent when save notifications are disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotifyOutcome>,
}

/// Builds a record from a daily entry, stores it, then notifies.
pub async fn save_sale(
    State(state): State<SharedState>,
    Json(mut entry): Json<DailyEntry>,
) -> ApiResult<(StatusCode, Json<SaveResponse>)> {
    entry.tax_rate.get_or_insert(state.default_tax_rate());

    let mut record = {
        let catalog = state.catalog().read().await;
        entry.into_record(&catalog, String::new())?
    };
    validate_record(&record)?;

    record.id = state.store().append(&record).await?;
    info!(
        id = %record.id,
        date = %record.date,
        recorder = %record.recorder,
        total = record.total.amount(),
        connected = state.connected(),
        "Sales record saved"
    );
    if !state.connected() {
        warn!(id = %record.id, "Record kept in memory only; it will be lost on restart");
    }

    let notification = if state.notify_on_save() {
        let outcome = state
            .notifier()
            .notify(&save_notification_text(&record))
            .await;
        Some(outcome)
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            record,
            connected: state.connected(),
            notification,
        }),
    ))
}
