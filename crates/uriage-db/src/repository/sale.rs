//! # SQLite Sales Store
//!
//! Persists sales records into `sales` and `sale_line_items`.
//!
//! ## Append
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO sales (id, date, recorder, subtotal, tax, total, ...) │
//! │   ├── INSERT INTO sale_line_items (sale_id, position = 0, ...)          │
//! │   ├── INSERT INTO sale_line_items (sale_id, position = 1, ...)          │
//! │   └── ...                                                               │
//! │  COMMIT   (any failure rolls the whole record back)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are never updated or deleted through this store.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use uriage_core::{LineItem, SalesRecord, TaxRate, Yen};

use super::{SalesStore, SortDirection, SortField};
use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: NaiveDate,
    recorder: String,
    subtotal: i64,
    tax: i64,
    total: i64,
    tax_rate: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    sale_id: String,
    product_id: i64,
    name: String,
    unit_price: i64,
    tax_rate: i64,
    quantity: i64,
    work_time_minutes: i64,
    subtotal: i64,
}

fn tax_rate_from_column(table: &str, value: i64) -> DbResult<TaxRate> {
    u8::try_from(value)
        .ok()
        .and_then(|percent| TaxRate::from_percent(percent).ok())
        .ok_or_else(|| DbError::corrupt(table, format!("tax_rate {value}")))
}

impl LineItemRow {
    fn into_line_item(self) -> DbResult<LineItem> {
        let product_id = u32::try_from(self.product_id).map_err(|_| {
            DbError::corrupt("sale_line_items", format!("product_id {}", self.product_id))
        })?;

        Ok(LineItem {
            product_id,
            name: self.name,
            unit_price: Yen::new(self.unit_price),
            tax_rate: tax_rate_from_column("sale_line_items", self.tax_rate)?,
            quantity: self.quantity,
            work_time_minutes: self.work_time_minutes,
            subtotal: Yen::new(self.subtotal),
        })
    }
}

impl SaleRow {
    fn into_record(self, line_items: Vec<LineItem>) -> DbResult<SalesRecord> {
        Ok(SalesRecord {
            tax_rate: tax_rate_from_column("sales", self.tax_rate)?,
            id: self.id,
            date: self.date,
            recorder: self.recorder,
            line_items,
            subtotal: Yen::new(self.subtotal),
            tax: Yen::new(self.tax),
            total: Yen::new(self.total),
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Sales store backed by the SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteSalesStore {
    pool: SqlitePool,
}

impl SqliteSalesStore {
    /// Creates a new SqliteSalesStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSalesStore { pool }
    }

    /// Number of stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn load_line_items(&self) -> DbResult<HashMap<String, Vec<LineItem>>> {
        let rows: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT sale_id, product_id, name, unit_price, tax_rate,
                   quantity, work_time_minutes, subtotal
            FROM sale_line_items
            ORDER BY sale_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in rows {
            let sale_id = row.sale_id.clone();
            by_sale.entry(sale_id).or_default().push(row.into_line_item()?);
        }
        Ok(by_sale)
    }
}

#[async_trait]
impl SalesStore for SqliteSalesStore {
    async fn append(&self, record: &SalesRecord) -> DbResult<String> {
        let id = if record.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            record.id.clone()
        };

        debug!(id = %id, date = %record.date, items = record.line_items.len(), "Appending sales record");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, date, recorder, subtotal, tax, total, tax_rate, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(record.date)
        .bind(&record.recorder)
        .bind(record.subtotal.amount())
        .bind(record.tax.amount())
        .bind(record.total.amount())
        .bind(i64::from(record.tax_rate.percent()))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::DuplicateId { table, .. } => DbError::duplicate(table, id.clone()),
            other => other,
        })?;

        for (position, item) in record.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_line_items (
                    sale_id, position, product_id, name, unit_price, tax_rate,
                    quantity, work_time_minutes, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&id)
            .bind(position as i64)
            .bind(i64::from(item.product_id))
            .bind(&item.name)
            .bind(item.unit_price.amount())
            .bind(i64::from(item.tax_rate.percent()))
            .bind(item.quantity)
            .bind(item.work_time_minutes)
            .bind(item.subtotal.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn list_ordered_by(
        &self,
        field: SortField,
        direction: SortDirection,
    ) -> DbResult<Vec<SalesRecord>> {
        let order_by = match (field, direction) {
            (SortField::Date, SortDirection::Asc) => "date ASC, seq ASC",
            (SortField::Date, SortDirection::Desc) => "date DESC, seq DESC",
        };
        let sql = format!(
            "SELECT id, date, recorder, subtotal, tax, total, tax_rate FROM sales ORDER BY {order_by}"
        );

        let rows: Vec<SaleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        let mut items = self.load_line_items().await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let line_items = items.remove(&row.id).unwrap_or_default();
                row.into_record(line_items)
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = records.len(), "Listed sales records");
        Ok(records)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uriage_core::demo::demo_sales_history;

    async fn store() -> SqliteSalesStore {
        Database::new(DbConfig::in_memory()).await.unwrap().sales()
    }

    #[tokio::test]
    async fn test_append_and_list_round_trip() {
        let store = store().await;
        let record = demo_sales_history().remove(0);

        let id = store.append(&record).await.unwrap();
        assert_eq!(id, "1");

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![record]);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_id_is_assigned() {
        let store = store().await;
        let mut record = demo_sales_history().remove(1);
        record.id = String::new();

        let id = store.append(&record).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.list().await.unwrap()[0].id, id);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = store().await;
        let record = demo_sales_history().remove(0);
        store.append(&record).await.unwrap();

        let err = store.append(&record).await.unwrap_err();
        assert!(matches!(err, DbError::DuplicateId { id, .. } if id == "1"));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
