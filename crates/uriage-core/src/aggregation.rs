//! # Aggregation Engine
//!
//! Pure reductions over a snapshot of sales records. Every report in the
//! application is recomputed from scratch by one of these functions; nothing
//! is cached or incrementally maintained.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records ──┬──► aggregate_by_month        → Vec<MonthlyAggregate>       │
//! │            │      key: YYYY-MM of date, Σ total, Σ subtotal per name    │
//! │            │                                                            │
//! │            ├──► aggregate_product_time    → Vec<ProductTimeAggregate>   │
//! │            │      key: product name, Σ minutes, Σ quantity, average     │
//! │            │                                                            │
//! │            ├──► group_products_for_period → Vec<GroupedProduct>         │
//! │            │      filter by day/month, key: name, Σ qty, Σ subtotal     │
//! │            │                                                            │
//! │            └──► available_months / sales_totals (dashboard)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All outputs have a deterministic order, so the same multiset of records
//! produces the same report regardless of input order.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::money::Yen;
use crate::types::{Period, SalesRecord, TaxRate, YearMonth};

// =============================================================================
// Report Types
// =============================================================================

/// Sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    #[ts(as = "String")]
    pub year_month: YearMonth,
    /// Σ record.total (tax included).
    pub total_sales: Yen,
    /// Σ line item subtotal (tax excluded), per product name.
    pub product_sales_by_name: BTreeMap<String, Yen>,
}

/// Work-time statistics for one product name across all records.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductTimeAggregate {
    pub product_name: String,
    pub total_work_time: i64,
    pub total_produced: i64,
    /// Minutes per unit. `None` when nothing was produced.
    pub average_time: Option<f64>,
}

/// One invoice/report row: a product name summed over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GroupedProduct {
    pub name: String,
    /// Price of the first occurrence in the period.
    pub unit_price: Yen,
    /// Tax rate of the first occurrence in the period.
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
    pub quantity: i64,
    pub subtotal: Yen,
    /// Set when later occurrences disagree on price or tax rate.
    pub has_conflicting_terms: bool,
}

/// Dashboard headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub record_count: usize,
    pub total_sales: Yen,
    pub product_count: i64,
}

// =============================================================================
// Monthly
// =============================================================================

/// Groups records by the year-month of their date.
///
/// Output is ascending by month.
///
/// ## Example
/// ```rust
/// use uriage_core::aggregation::aggregate_by_month;
/// use uriage_core::demo::demo_sales_history;
///
/// let months = aggregate_by_month(&demo_sales_history());
/// assert_eq!(months.len(), 1);
/// assert_eq!(months[0].year_month.to_string(), "2025-04");
/// assert_eq!(months[0].total_sales.amount(), 5340 + 7348 + 7210 + 9504 + 12127);
/// ```
pub fn aggregate_by_month(records: &[SalesRecord]) -> Vec<MonthlyAggregate> {
    let mut months: BTreeMap<YearMonth, MonthlyAggregate> = BTreeMap::new();

    for record in records {
        let ym = record.year_month();
        let month = months.entry(ym).or_insert_with(|| MonthlyAggregate {
            year_month: ym,
            total_sales: Yen::zero(),
            product_sales_by_name: BTreeMap::new(),
        });

        month.total_sales += record.total;
        for item in &record.line_items {
            *month
                .product_sales_by_name
                .entry(item.name.clone())
                .or_default() += item.subtotal;
        }
    }

    months.into_values().collect()
}

// =============================================================================
// Product Time
// =============================================================================

/// Sums work minutes and produced units per product name.
///
/// Items recorded with zero minutes still count toward `total_produced`.
/// The average is computed once, after all sums are final.
pub fn aggregate_product_time(records: &[SalesRecord]) -> Vec<ProductTimeAggregate> {
    let mut sums: BTreeMap<&str, (i64, i64)> = BTreeMap::new();

    for item in records.iter().flat_map(|r| &r.line_items) {
        let (minutes, produced) = sums.entry(item.name.as_str()).or_default();
        *minutes += item.work_time_minutes;
        *produced += item.quantity;
    }

    sums.into_iter()
        .map(|(name, (minutes, produced))| ProductTimeAggregate {
            product_name: name.to_string(),
            total_work_time: minutes,
            total_produced: produced,
            average_time: (produced > 0).then(|| minutes as f64 / produced as f64),
        })
        .collect()
}

// =============================================================================
// Grouped Products
// =============================================================================

/// Groups the line items of every record inside `period` by product name.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use uriage_core::aggregation::group_products_for_period;
/// use uriage_core::demo::demo_sales_history;
/// use uriage_core::types::Period;
///
/// let day = Period::Day(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// let rows = group_products_for_period(&demo_sales_history(), day);
/// assert_eq!(rows[0].name, "匠");          // ¥1,775 is the largest subtotal
/// assert_eq!(rows.len(), 3);
/// ```
pub fn group_products_for_period(records: &[SalesRecord], period: Period) -> Vec<GroupedProduct> {
    group_products_where(records, |record| period.contains(record.date))
}

/// General form of [`group_products_for_period`] taking any record filter.
///
/// Sorted by subtotal descending, then name ascending.
pub fn group_products_where<F>(records: &[SalesRecord], mut keep: F) -> Vec<GroupedProduct>
where
    F: FnMut(&SalesRecord) -> bool,
{
    let mut groups: BTreeMap<&str, GroupedProduct> = BTreeMap::new();

    for item in records
        .iter()
        .filter(|record| keep(record))
        .flat_map(|record| &record.line_items)
    {
        match groups.get_mut(item.name.as_str()) {
            Some(group) => {
                group.quantity += item.quantity;
                group.subtotal += item.subtotal;
                if group.unit_price != item.unit_price || group.tax_rate != item.tax_rate {
                    group.has_conflicting_terms = true;
                }
            }
            None => {
                groups.insert(
                    item.name.as_str(),
                    GroupedProduct {
                        name: item.name.clone(),
                        unit_price: item.unit_price,
                        tax_rate: item.tax_rate,
                        quantity: item.quantity,
                        subtotal: item.subtotal,
                        has_conflicting_terms: false,
                    },
                );
            }
        }
    }

    let mut rows: Vec<GroupedProduct> = groups.into_values().collect();
    // BTreeMap already yields names ascending; a stable sort keeps that for ties
    rows.sort_by(|a, b| b.subtotal.cmp(&a.subtotal));
    rows
}

// =============================================================================
// Dashboard
// =============================================================================

/// Distinct months that have at least one record, ascending.
pub fn available_months(records: &[SalesRecord]) -> Vec<YearMonth> {
    records
        .iter()
        .map(SalesRecord::year_month)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Overall totals across every record.
pub fn sales_totals(records: &[SalesRecord]) -> SalesTotals {
    SalesTotals {
        record_count: records.len(),
        total_sales: records.iter().map(|r| r.total).sum(),
        product_count: records.iter().map(SalesRecord::product_count).sum(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_sales_history;
    use crate::types::LineItem;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(id: &str, day: &str, items: Vec<LineItem>) -> SalesRecord {
        SalesRecord::new(id, date(day), "中元", items, TaxRate::Standard)
    }

    fn item(name: &str, price: i64, qty: i64, minutes: i64, rate: TaxRate) -> LineItem {
        LineItem::new(0, name, Yen::new(price), rate, qty, minutes)
    }

    fn mixed_months() -> Vec<SalesRecord> {
        vec![
            record("a", "2025-05-02", vec![item("中辛", 175, 2, 10, TaxRate::Reduced)]),
            record(
                "b",
                "2025-04-30",
                vec![
                    item("中辛", 175, 4, 20, TaxRate::Reduced),
                    item("CGC", 275, 1, 0, TaxRate::Standard),
                ],
            ),
            record("c", "2025-05-20", vec![item("匠", 355, 1, 5, TaxRate::Reduced)]),
        ]
    }

    #[test]
    fn test_monthly_sum_equals_record_totals() {
        let records = mixed_months();
        let months = aggregate_by_month(&records);

        let monthly_sum: Yen = months.iter().map(|m| m.total_sales).sum();
        let record_sum: Yen = records.iter().map(|r| r.total).sum();
        assert_eq!(monthly_sum, record_sum);
    }

    #[test]
    fn test_monthly_sorted_with_product_breakdown() {
        let months = aggregate_by_month(&mixed_months());
        let keys: Vec<String> = months.iter().map(|m| m.year_month.to_string()).collect();
        assert_eq!(keys, vec!["2025-04", "2025-05"]);

        let april = &months[0];
        assert_eq!(april.product_sales_by_name["中辛"].amount(), 700);
        assert_eq!(april.product_sales_by_name["CGC"].amount(), 275);

        let may = &months[1];
        assert_eq!(may.product_sales_by_name["中辛"].amount(), 350);
        assert_eq!(may.product_sales_by_name["匠"].amount(), 355);
    }

    #[test]
    fn test_monthly_empty_input() {
        assert!(aggregate_by_month(&[]).is_empty());
    }

    #[test]
    fn test_product_time_average() {
        let records = vec![
            record("a", "2025-04-01", vec![item("中辛", 175, 3, 60, TaxRate::Reduced)]),
            record("b", "2025-04-02", vec![item("中辛", 175, 1, 40, TaxRate::Reduced)]),
        ];
        let stats = aggregate_product_time(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_work_time, 100);
        assert_eq!(stats[0].total_produced, 4);
        assert_eq!(stats[0].average_time, Some(25.0));
    }

    #[test]
    fn test_product_time_zero_minutes_still_count_units() {
        let records = vec![record(
            "a",
            "2025-04-01",
            vec![
                item("CGC", 275, 3, 0, TaxRate::Standard),
                item("CGC", 275, 1, 8, TaxRate::Standard),
            ],
        )];
        let stats = aggregate_product_time(&records);
        assert_eq!(stats[0].total_produced, 4);
        assert_eq!(stats[0].average_time, Some(2.0));
    }

    #[test]
    fn test_product_time_nothing_produced_has_no_average() {
        let records = vec![record("a", "2025-04-01", vec![item("匠", 355, 0, 15, TaxRate::Reduced)])];
        let stats = aggregate_product_time(&records);
        assert_eq!(stats[0].total_produced, 0);
        assert_eq!(stats[0].average_time, None);
    }

    #[test]
    fn test_grouping_for_month() {
        let april = Period::Month("2025-04".parse().unwrap());
        let rows = group_products_for_period(&demo_sales_history(), april);

        assert_eq!(rows.len(), 15);
        assert_eq!(rows[0].name, "330g");
        assert_eq!(rows[0].subtotal.amount(), 4125);
        assert!(rows.windows(2).all(|w| w[0].subtotal >= w[1].subtotal));

        let total: Yen = rows.iter().map(|r| r.subtotal).sum();
        assert_eq!(total.amount(), 4855 + 6680 + 6555 + 8640 + 11025);
    }

    #[test]
    fn test_grouping_ties_break_by_name() {
        let records = vec![record(
            "a",
            "2025-04-01",
            vec![
                item("b", 100, 1, 0, TaxRate::Standard),
                item("a", 100, 1, 0, TaxRate::Standard),
            ],
        )];
        let rows = group_products_where(&records, |_| true);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_grouping_is_order_independent() {
        let mut records = mixed_months();
        let forward = group_products_where(&records, |_| true);
        records.reverse();
        let backward = group_products_where(&records, |_| true);

        let strip = |rows: Vec<GroupedProduct>| -> Vec<(String, i64, i64)> {
            rows.into_iter()
                .map(|r| (r.name, r.quantity, r.subtotal.amount()))
                .collect()
        };
        assert_eq!(strip(forward), strip(backward));
    }

    #[test]
    fn test_grouping_flags_conflicting_terms() {
        let records = vec![
            record("a", "2025-04-01", vec![item("中辛", 175, 2, 0, TaxRate::Reduced)]),
            record("b", "2025-04-02", vec![item("中辛", 180, 1, 0, TaxRate::Reduced)]),
        ];
        let rows = group_products_where(&records, |_| true);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].has_conflicting_terms);
        assert_eq!(rows[0].unit_price.amount(), 175);
        assert_eq!(rows[0].quantity, 3);
        assert_eq!(rows[0].subtotal.amount(), 530);
    }

    #[test]
    fn test_grouping_for_day_excludes_other_days() {
        let day = Period::Day(date("2025-04-30"));
        let rows = group_products_for_period(&mixed_months(), day);
        assert_eq!(rows.len(), 2);
        assert!(group_products_for_period(&mixed_months(), Period::Day(date("2025-06-01"))).is_empty());
    }

    #[test]
    fn test_available_months_and_totals() {
        let records = mixed_months();
        let months: Vec<String> = available_months(&records).iter().map(ToString::to_string).collect();
        assert_eq!(months, vec!["2025-04", "2025-05"]);

        let totals = sales_totals(&records);
        assert_eq!(totals.record_count, 3);
        assert_eq!(totals.product_count, 8);
        assert_eq!(totals.total_sales, records.iter().map(|r| r.total).sum());
    }
}
