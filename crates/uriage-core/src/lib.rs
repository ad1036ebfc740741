//! # uriage-core: Pure Business Logic for Uriage
//!
//! This crate holds the sales arithmetic of Uriage as pure functions with
//! zero I/O dependencies: aggregation of sales records into reports, and the
//! split 8% / 10% consumption tax math for invoices.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Uriage Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    POST /api/sales, GET /api/reports/*, GET /api/invoices/*     │   │
//! │  └──────────┬───────────────────┬──────────────────────┬──────────┘   │
//! │             │                   │                      │               │
//! │  ┌──────────▼──────────────┐    │           ┌──────────▼──────────┐    │
//! │  │ uriage-db (SalesStore)  │    │           │ uriage-notify       │    │
//! │  └─────────────────────────┘    │           └─────────────────────┘    │
//! │  ┌──────────────────────────────▼──────────────────────────────────┐   │
//! │  │               ★ uriage-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ aggregation│  │  invoice  │  │   entry   │  │   │
//! │  │   │ SalesRec  │  │  monthly   │  │  8% / 10% │  │ DailyEntry│  │   │
//! │  │   │ LineItem  │  │  per-time  │  │  buckets  │  │ → record  │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Sales records, line items, tax rate, year-month, period
//! - [`money`] - `Yen` with integer floor-tax arithmetic
//! - [`aggregation`] - Monthly, product-time and per-period reports
//! - [`invoice`] - Split-rate invoice totals and document model
//! - [`entry`] - Daily entry form to sales record
//! - [`catalog`] - Product catalog
//! - [`company`] - Issuer/client settings
//! - [`summary`] - Post-save notification text
//! - [`demo`] - Built-in demo history
//! - [`error`] / [`validation`] - Domain errors and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use uriage_core::aggregation::aggregate_by_month;
//! use uriage_core::demo::demo_sales_history;
//!
//! let months = aggregate_by_month(&demo_sales_history());
//! assert_eq!(months[0].product_sales_by_name["匠"].amount(), 1775);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod catalog;
pub mod company;
pub mod demo;
pub mod entry;
pub mod error;
pub mod invoice;
pub mod money;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Yen;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum units of one product in a single daily entry.
///
/// ## Business Reason
/// Catches slips like typing 1200 instead of 12.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Highest catalog unit price, in yen.
///
/// Times [`MAX_ITEM_QUANTITY`] and summed over a whole catalog this stays
/// far inside `i64`, so record and invoice arithmetic cannot overflow.
pub const MAX_UNIT_PRICE: i64 = 10_000_000;

/// Maximum product name length, in characters.
pub const MAX_NAME_LENGTH: usize = 100;
