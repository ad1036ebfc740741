//! # Record Store Module
//!
//! The `SalesStore` trait and its implementations.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  store.append(&record)                                          │
//! │       │  store.list_ordered_by(SortField::Date, SortDirection::Asc)     │
//! │       ▼                                                                 │
//! │  Arc<dyn SalesStore>                                                   │
//! │   ├── SqliteSalesStore  (connected: sales + sale_line_items tables)    │
//! │   └── MemorySalesStore  (offline: Vec behind a RwLock, demo seeded)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both implementations return records in the same stable order: by date,
//! then by save order for records sharing a date.

use async_trait::async_trait;
use serde::Deserialize;
use uriage_core::SalesRecord;

use crate::error::DbResult;

pub mod memory;
pub mod sale;

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Append-only storage of sales records.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Persists a record and returns its id.
    async fn append(&self, record: &SalesRecord) -> DbResult<String>;

    /// Every stored record, ordered by `field`.
    ///
    /// Ties keep save order when ascending and reverse it when descending.
    async fn list_ordered_by(
        &self,
        field: SortField,
        direction: SortDirection,
    ) -> DbResult<Vec<SalesRecord>>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Every stored record, oldest date first.
    async fn list(&self) -> DbResult<Vec<SalesRecord>> {
        self.list_ordered_by(SortField::Date, SortDirection::Asc)
            .await
    }
}
