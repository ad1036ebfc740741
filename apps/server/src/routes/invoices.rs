//! # Invoice Handlers
//!
//! `GET /api/invoices/daily/2025-04-03` and `/api/invoices/monthly/2025-04`
//! return the full invoice document model. `?issued=YYYY-MM-DD` pins the
//! issue date; otherwise today's local date is used.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::info;
use uriage_core::aggregation::group_products_for_period;
use uriage_core::invoice::Invoice;
use uriage_core::{Period, YearMonth};

use super::parse_date;
use super::reports::{load_records, log_conflicting_terms};
use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub issued: Option<String>,
}

pub async fn daily(
    State(state): State<SharedState>,
    Path(date): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Json<Invoice>> {
    let period = Period::Day(parse_date(&date)?);
    build(&state, period, query).await
}

pub async fn monthly(
    State(state): State<SharedState>,
    Path(year_month): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Json<Invoice>> {
    let ym: YearMonth = year_month.parse().map_err(ApiError::from)?;
    build(&state, Period::Month(ym), query).await
}

async fn build(state: &SharedState, period: Period, query: InvoiceQuery) -> ApiResult<Json<Invoice>> {
    let issue_date = match query.issued.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };

    let records = load_records(state).await?;
    log_conflicting_terms(period, &group_products_for_period(&records, period));

    let company = state.company().read().await.clone();
    let invoice = Invoice::build(period, &records, &company, issue_date)?;
    info!(
        number = %invoice.number,
        grand_total = invoice.totals.grand_total.amount(),
        "Invoice built"
    );
    Ok(Json(invoice))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
