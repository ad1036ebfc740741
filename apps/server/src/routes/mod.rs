//! # Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/health                     health.rs                       │
//! │  GET    /api/sales                      sales.rs                        │
//! │  POST   /api/sales                      sales.rs   (save + notify)      │
//! │  GET    /api/reports/monthly            reports.rs                      │
//! │  GET    /api/reports/product-time       reports.rs                      │
//! │  GET    /api/reports/summary            reports.rs                      │
//! │  GET    /api/reports/products/{period}  reports.rs                      │
//! │  GET    /api/invoices/daily/{date}      invoices.rs                     │
//! │  GET    /api/invoices/monthly/{ym}      invoices.rs                     │
//! │  GET    /api/company-info               company.rs                      │
//! │  PUT    /api/company-info               company.rs                      │
//! │  GET    /api/products                   products.rs                     │
//! │  POST   /api/products                   products.rs                     │
//! │  PUT    /api/products/{id}              products.rs                     │
//! │  DELETE /api/products/{id}              products.rs                     │
//! │  GET    /api/recorders                  products.rs                     │
//! │  POST   /api/notify                     notify.rs                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod company;
pub mod health;
pub mod invoices;
pub mod notify;
pub mod products;
pub mod reports;
pub mod sales;

use axum::routing::{get, put};
use axum::Router;
use chrono::NaiveDate;
use uriage_core::{Period, YearMonth};

use crate::error::ApiError;
use crate::state::SharedState;

/// Builds the full API router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/sales", get(sales::list_sales).post(sales::save_sale))
        .route("/api/reports/monthly", get(reports::monthly))
        .route("/api/reports/product-time", get(reports::product_time))
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/reports/products/{period}", get(reports::products_for_period))
        .route("/api/invoices/daily/{date}", get(invoices::daily))
        .route("/api/invoices/monthly/{year_month}", get(invoices::monthly))
        .route(
            "/api/company-info",
            get(company::get_company_info).put(company::update_company_info),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::add_product),
        )
        .route(
            "/api/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/recorders", get(products::list_recorders))
        .route("/api/notify", axum::routing::post(notify::send_message))
        .with_state(state)
}

/// Parses `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Parses `YYYY-MM-DD` as a day or `YYYY-MM` as a month.
pub(crate) fn parse_period(raw: &str) -> Result<Period, ApiError> {
    if raw.len() == 10 {
        return parse_date(raw).map(Period::Day);
    }
    raw.parse::<YearMonth>()
        .map(Period::Month)
        .map_err(|_| ApiError::validation(format!("Invalid period '{}', expected YYYY-MM-DD or YYYY-MM", raw)))
}
