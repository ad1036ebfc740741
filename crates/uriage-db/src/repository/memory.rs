//! In-memory sales store, used when SQLite is unavailable and in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use uriage_core::demo::demo_sales_history;
use uriage_core::SalesRecord;

use super::{SalesStore, SortDirection, SortField};
use crate::error::{DbError, DbResult};

/// Records kept in a `Vec` sorted by date, save order within a date.
#[derive(Debug, Default)]
pub struct MemorySalesStore {
    records: RwLock<Vec<SalesRecord>>,
}

impl MemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the April 2025 demo history.
    pub fn demo() -> Self {
        Self::with_records(demo_sales_history())
    }

    pub fn with_records(mut records: Vec<SalesRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SalesStore for MemorySalesStore {
    async fn append(&self, record: &SalesRecord) -> DbResult<String> {
        let mut records = self.records.write().await;

        let mut record = record.clone();
        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        }
        if records.iter().any(|r| r.id == record.id) {
            return Err(DbError::duplicate("sales", record.id));
        }

        // After every record with the same or an earlier date
        let index = records.partition_point(|r| r.date <= record.date);
        debug!(id = %record.id, index, "Appending sales record in memory");

        let id = record.id.clone();
        records.insert(index, record);
        Ok(id)
    }

    async fn list_ordered_by(
        &self,
        field: SortField,
        direction: SortDirection,
    ) -> DbResult<Vec<SalesRecord>> {
        let records = self.records.read().await;
        let mut listed = records.clone();

        match (field, direction) {
            (SortField::Date, SortDirection::Asc) => {}
            (SortField::Date, SortDirection::Desc) => listed.reverse(),
        }
        Ok(listed)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uriage_core::{LineItem, TaxRate, Yen};

    fn record(id: &str, day: u32) -> SalesRecord {
        SalesRecord::new(
            id,
            NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            "河西",
            vec![LineItem::new(1, "中辛", Yen::new(175), TaxRate::Reduced, 1, 0)],
            TaxRate::Standard,
        )
    }

    fn ids(records: &[SalesRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_append_keeps_date_order() {
        let store = MemorySalesStore::new();
        store.append(&record("late", 20)).await.unwrap();
        store.append(&record("early", 2)).await.unwrap();
        store.append(&record("mid", 10)).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(ids(&listed), vec!["early", "mid", "late"]);
    }

    #[tokio::test]
    async fn test_same_date_keeps_save_order() {
        let store = MemorySalesStore::new();
        store.append(&record("first", 5)).await.unwrap();
        store.append(&record("second", 5)).await.unwrap();
        store.append(&record("before", 4)).await.unwrap();

        let asc = store.list().await.unwrap();
        assert_eq!(ids(&asc), vec!["before", "first", "second"]);

        let desc = store
            .list_ordered_by(SortField::Date, SortDirection::Desc)
            .await
            .unwrap();
        assert_eq!(ids(&desc), vec!["second", "first", "before"]);
    }

    #[tokio::test]
    async fn test_demo_store() {
        let store = MemorySalesStore::demo();
        assert_eq!(store.len().await, 5);
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_duplicate_and_generated_ids() {
        let store = MemorySalesStore::demo();
        assert!(store.append(&record("1", 9)).await.is_err());

        let id = store.append(&record("", 9)).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.len().await, 6);
    }
}
