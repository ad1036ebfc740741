//! # Daily Entry
//!
//! Turns the entry form (quantities and work times keyed by product id)
//! into an immutable [`SalesRecord`].
//!
//! ## Flow
//! ```text
//! ┌────────────────────────┐
//! │ DailyEntry             │   quantities {1: 8, 2: 12, 5: 0 ...}
//! │  date, recorder        │   work_times {1: 25, 2: 35}
//! └───────────┬────────────┘
//!             │ into_record(&catalog, id)
//!             ▼
//! ┌────────────────────────┐
//! │ validate recorder      │──► Required
//! │ validate quantities    │──► OutOfRange / Negative
//! │ look up catalog        │──► ProductNotFound
//! │ drop zero rows         │
//! │ at least one row left  │──► EmptyEntry
//! └───────────┬────────────┘
//!             ▼
//!        SalesRecord (subtotal, floor tax, total)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::types::{LineItem, SalesRecord, TaxRate};
use crate::validation::{
    validate_quantity, validate_recorder, validate_unit_price, validate_work_time,
};

/// What the user submits for one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub recorder: String,
    /// Units produced, keyed by catalog product id.
    pub quantities: BTreeMap<u32, i64>,
    /// Minutes spent, keyed by catalog product id. Missing means 0.
    #[serde(default)]
    pub work_times: BTreeMap<u32, i64>,
    /// Record-level tax rate; 10% when absent.
    #[serde(default)]
    #[ts(as = "Option<u8>")]
    pub tax_rate: Option<TaxRate>,
}

impl DailyEntry {
    /// Builds the sales record for this entry.
    ///
    /// Line items follow catalog order, and name, price and tax rate are
    /// copied from the catalog as of now.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use uriage_core::catalog::ProductCatalog;
    /// use uriage_core::entry::DailyEntry;
    ///
    /// let entry = DailyEntry {
    ///     date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
    ///     recorder: "中元".to_string(),
    ///     quantities: [(1, 8), (2, 12)].into_iter().collect(),
    ///     ..Default::default()
    /// };
    ///
    /// let record = entry.into_record(&ProductCatalog::default(), "r-1").unwrap();
    /// assert_eq!(record.subtotal.amount(), 1400 + 1680);
    /// ```
    pub fn into_record(
        self,
        catalog: &ProductCatalog,
        id: impl Into<String>,
    ) -> CoreResult<SalesRecord> {
        validate_recorder(&self.recorder)?;
        for &qty in self.quantities.values() {
            validate_quantity(qty)?;
        }
        for &minutes in self.work_times.values() {
            validate_work_time(minutes)?;
        }

        if let Some(&unknown) = self
            .quantities
            .iter()
            .filter(|(_, &qty)| qty > 0)
            .map(|(id, _)| id)
            .find(|id| catalog.get(**id).is_none())
        {
            return Err(CoreError::ProductNotFound(unknown));
        }

        let mut line_items = Vec::new();
        for product in catalog.products() {
            let qty = self.quantities.get(&product.id).copied().unwrap_or(0);
            if qty == 0 {
                continue;
            }
            // A catalog loaded from settings.toml never went through add()
            validate_unit_price(product.unit_price)?;
            let minutes = self.work_times.get(&product.id).copied().unwrap_or(0);
            line_items.push(LineItem::new(
                product.id,
                product.name.clone(),
                product.unit_price,
                product.tax_rate,
                qty,
                minutes,
            ));
        }

        if line_items.is_empty() {
            return Err(CoreError::EmptyEntry);
        }

        Ok(SalesRecord::new(
            id,
            self.date,
            self.recorder.trim(),
            line_items,
            self.tax_rate.unwrap_or_default(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn entry(quantities: &[(u32, i64)]) -> DailyEntry {
        DailyEntry {
            date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            recorder: "河西".to_string(),
            quantities: quantities.iter().copied().collect(),
            work_times: BTreeMap::new(),
            tax_rate: None,
        }
    }

    #[test]
    fn test_builds_record_in_catalog_order() {
        let mut e = entry(&[(12, 1), (1, 2)]);
        e.work_times.insert(1, 20);

        let record = e.into_record(&ProductCatalog::default(), "x").unwrap();

        let names: Vec<&str> = record.line_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["中辛", "ビニール（中辛）"]);
        assert_eq!(record.line_items[0].work_time_minutes, 20);
        assert_eq!(record.line_items[1].work_time_minutes, 0);
        assert_eq!(record.line_items[1].tax_rate, TaxRate::Standard);

        // 350 + 685 = 1035, 10% floor = 103
        assert_eq!(record.subtotal.amount(), 1035);
        assert_eq!(record.tax.amount(), 103);
        assert_eq!(record.total.amount(), 1138);
        assert_eq!(record.tax_rate, TaxRate::Standard);
    }

    #[test]
    fn test_explicit_record_tax_rate() {
        let mut e = entry(&[(2, 10)]);
        e.tax_rate = Some(TaxRate::Reduced);
        let record = e.into_record(&ProductCatalog::default(), "x").unwrap();
        assert_eq!(record.tax.amount(), 112);
    }

    #[test]
    fn test_zero_quantities_are_skipped() {
        let record = entry(&[(1, 0), (2, 3), (3, 0)])
            .into_record(&ProductCatalog::default(), "x")
            .unwrap();
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].product_id, 2);
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        let result = entry(&[(1, 0)]).into_record(&ProductCatalog::default(), "x");
        assert!(matches!(result, Err(CoreError::EmptyEntry)));

        let result = entry(&[]).into_record(&ProductCatalog::default(), "x");
        assert!(matches!(result, Err(CoreError::EmptyEntry)));
    }

    #[test]
    fn test_recorder_is_required() {
        let mut e = entry(&[(1, 1)]);
        e.recorder = "  ".to_string();
        let result = e.into_record(&ProductCatalog::default(), "x");
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let result = entry(&[(1, -2)]).into_record(&ProductCatalog::default(), "x");
        assert!(matches!(result, Err(CoreError::Validation(_))));

        let mut e = entry(&[(1, 2)]);
        e.work_times.insert(1, -1);
        assert!(e.into_record(&ProductCatalog::default(), "x").is_err());
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let result = entry(&[(1, 1), (99, 1)]).into_record(&ProductCatalog::default(), "x");
        assert!(matches!(result, Err(CoreError::ProductNotFound(99))));
    }

    #[test]
    fn test_overpriced_catalog_product_is_rejected() {
        let catalog: ProductCatalog = serde_json::from_str(&format!(
            r#"[{{"id": 1, "name": "特注", "unitPrice": {}, "taxRate": 10}}]"#,
            i64::MAX / 2 + 1
        ))
        .unwrap();

        let result = entry(&[(1, 2)]).into_record(&catalog, "x");
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_deserializes_string_keys() {
        let json = r#"{
            "date": "2025-04-10",
            "recorder": "木島",
            "quantities": {"1": 8, "2": 12},
            "workTimes": {"1": 25}
        }"#;
        let e: DailyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.quantities.get(&2), Some(&12));
        assert_eq!(e.tax_rate, None);
    }
}
