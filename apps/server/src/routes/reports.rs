//! # Report Handlers
//!
//! Read-only views over the full record set. Every handler loads the
//! records once and hands them to the pure aggregation functions.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::warn;
use uriage_core::aggregation::{
    aggregate_by_month, aggregate_product_time, available_months, group_products_for_period,
    sales_totals, GroupedProduct, MonthlyAggregate, ProductTimeAggregate, SalesTotals,
};
use uriage_core::{Period, SalesRecord, YearMonth};

use super::parse_period;
use crate::error::ApiResult;
use crate::state::SharedState;

pub(crate) async fn load_records(state: &SharedState) -> ApiResult<Vec<SalesRecord>> {
    Ok(state.store().list().await?)
}

/// Monthly totals and per-product sales, oldest month first.
pub async fn monthly(State(state): State<SharedState>) -> ApiResult<Json<Vec<MonthlyAggregate>>> {
    let records = load_records(&state).await?;
    Ok(Json(aggregate_by_month(&records)))
}

/// Work time and output per product name.
pub async fn product_time(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<ProductTimeAggregate>>> {
    let records = load_records(&state).await?;
    Ok(Json(aggregate_product_time(&records)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub totals: SalesTotals,
    pub months: Vec<YearMonth>,
}

/// Dashboard headline figures plus the months that have data.
pub async fn summary(State(state): State<SharedState>) -> ApiResult<Json<SummaryResponse>> {
    let records = load_records(&state).await?;
    Ok(Json(SummaryResponse {
        totals: sales_totals(&records),
        months: available_months(&records),
    }))
}

/// Products sold in a day (`YYYY-MM-DD`) or month (`YYYY-MM`), largest first.
pub async fn products_for_period(
    State(state): State<SharedState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<Vec<GroupedProduct>>> {
    let period = parse_period(&raw)?;
    let records = load_records(&state).await?;
    let grouped = group_products_for_period(&records, period);
    log_conflicting_terms(period, &grouped);
    Ok(Json(grouped))
}

/// Warns about groups whose occurrences disagreed on price or tax rate.
///
/// The first occurrence's terms are the ones shown, so an operator needs to
/// know the figures may not match every record.
pub(crate) fn log_conflicting_terms(period: Period, grouped: &[GroupedProduct]) {
    for row in grouped.iter().filter(|row| row.has_conflicting_terms) {
        warn!(
            %period,
            product = %row.name,
            unit_price = row.unit_price.amount(),
            tax_rate = row.tax_rate.percent(),
            "Product sold with differing price or tax rate; first occurrence shown"
        );
    }
}
