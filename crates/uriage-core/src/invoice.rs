//! # Invoice Calculator
//!
//! Computes the split-rate consumption tax figures printed on an invoice
//! and assembles the invoice document model around them.
//!
//! ## Tax Buckets
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GroupedProduct rows                                                    │
//! │   ├── rate 10% ──► Σ subtotal = tax10_base ──► tax10 = floor(base×10%)  │
//! │   └── rate  8% ──► Σ subtotal = tax8_base  ──► tax8  = floor(base× 8%)  │
//! │                                                                         │
//! │  grand_total = tax10_base + tax10 + tax8_base + tax8                    │
//! │                                                                         │
//! │  Rounding happens exactly once per bucket, on the bucket sum.           │
//! │  Never per line, never on an already rounded figure.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These bucket totals use each product's own rate. They are deliberately
//! independent of the record-level `tax`/`total`, which use the single rate
//! chosen at entry time; the invoice carries both.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use ts_rs::TS;

use crate::aggregation::{group_products_for_period, GroupedProduct};
use crate::company::CompanyInfo;
use crate::error::{CoreError, CoreResult};
use crate::money::Yen;
use crate::types::{Period, SalesRecord, TaxRate};

// =============================================================================
// Totals
// =============================================================================

/// The tax-split figures of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub tax10_base: Yen,
    pub tax8_base: Yen,
    pub tax10: Yen,
    pub tax8: Yen,
    pub grand_total: Yen,
}

impl InvoiceTotals {
    /// Computes taxes and grand total from the two bucket bases.
    ///
    /// ## Example
    /// ```rust
    /// use uriage_core::invoice::InvoiceTotals;
    /// use uriage_core::money::Yen;
    ///
    /// let totals = InvoiceTotals::from_bases(Yen::new(1400), Yen::new(1680));
    /// assert_eq!(totals.tax10.amount(), 140);
    /// assert_eq!(totals.tax8.amount(), 134);
    /// assert_eq!(totals.grand_total.amount(), 3354);
    /// ```
    pub fn from_bases(tax10_base: Yen, tax8_base: Yen) -> Self {
        let tax10 = tax10_base.floor_tax(TaxRate::Standard);
        let tax8 = tax8_base.floor_tax(TaxRate::Reduced);
        Self {
            tax10_base,
            tax8_base,
            tax10,
            tax8,
            grand_total: tax10_base + tax10 + tax8_base + tax8,
        }
    }

    /// Buckets grouped rows by their tax rate, then computes totals.
    pub fn from_grouped(rows: &[GroupedProduct]) -> Self {
        let base_for = |rate: TaxRate| -> Yen {
            rows.iter()
                .filter(|row| row.tax_rate == rate)
                .map(|row| row.subtotal)
                .sum()
        };
        Self::from_bases(base_for(TaxRate::Standard), base_for(TaxRate::Reduced))
    }
}

// =============================================================================
// Document Model
// =============================================================================

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Yen,
    pub amount: Yen,
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
    /// Printed as ※ next to reduced-rate rows.
    pub reduced_rate: bool,
}

impl From<&GroupedProduct> for InvoiceLine {
    fn from(row: &GroupedProduct) -> Self {
        Self {
            name: row.name.clone(),
            quantity: row.quantity,
            unit_price: row.unit_price,
            amount: row.subtotal,
            tax_rate: row.tax_rate,
            reduced_rate: row.tax_rate.is_reduced(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartyBlock {
    pub name: String,
    /// `〒{postal} {address}`.
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IssuerBlock {
    pub name: String,
    pub address: String,
    pub tel: String,
    pub email: String,
    pub registration_number: String,
    pub bank_info: String,
}

/// Subtotal, tax and total as recorded on the sales records of the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecordedFigures {
    pub subtotal: Yen,
    pub tax: Yen,
    pub total: Yen,
}

/// Everything needed to render an invoice for a day or a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// `INV-YYYYMMDD` for a day, `INV-YYYYMM` for a month.
    pub number: String,
    /// `YYYY-MM-DD` or `YYYY-MM`.
    pub period: String,
    #[ts(as = "String")]
    pub issue_date: NaiveDate,
    /// December 31 of the year after issue.
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub client: PartyBlock,
    pub issuer: IssuerBlock,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    pub recorded: RecordedFigures,
}

impl Invoice {
    /// Builds the invoice for every record inside `period`.
    ///
    /// ## Errors
    /// [`CoreError::NoRecordsForPeriod`] when the period has no sales.
    pub fn build(
        period: Period,
        records: &[SalesRecord],
        company: &CompanyInfo,
        issue_date: NaiveDate,
    ) -> CoreResult<Invoice> {
        let in_period: Vec<&SalesRecord> =
            records.iter().filter(|r| period.contains(r.date)).collect();
        if in_period.is_empty() {
            return Err(CoreError::NoRecordsForPeriod(period.to_string()));
        }

        let rows = group_products_for_period(records, period);
        let totals = InvoiceTotals::from_grouped(&rows);

        let recorded = RecordedFigures {
            subtotal: in_period.iter().map(|r| r.subtotal).sum(),
            tax: in_period.iter().map(|r| r.tax).sum(),
            total: in_period.iter().map(|r| r.total).sum(),
        };

        Ok(Invoice {
            number: invoice_number(period),
            period: period.to_string(),
            issue_date,
            due_date: due_date_for(issue_date),
            client: PartyBlock {
                name: company.client_name.clone(),
                address: postal_address(&company.client_postal_code, &company.client_address_line),
            },
            issuer: IssuerBlock {
                name: company.name.clone(),
                address: postal_address(&company.postal_code, &company.address_line),
                tel: company.tel.clone(),
                email: company.email.clone(),
                registration_number: company.registration_number.clone(),
                bank_info: company.bank_info.clone(),
            },
            lines: rows.iter().map(InvoiceLine::from).collect(),
            totals,
            recorded,
        })
    }
}

/// `INV-` followed by the period with the dashes removed.
pub fn invoice_number(period: Period) -> String {
    format!("INV-{}", period.to_string().replace('-', ""))
}

/// December 31 of the year following `issue_date`.
pub fn due_date_for(issue_date: NaiveDate) -> NaiveDate {
    let year = issue_date.year() + 1;
    // December 31 exists in every year chrono represents; only an issue
    // date in chrono's last year has no following year to point at
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(issue_date)
}

fn postal_address(postal_code: &str, line: &str) -> String {
    format!("〒{postal_code} {line}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_sales_history;
    use crate::types::LineItem;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_floor_per_bucket() {
        assert_eq!(InvoiceTotals::from_bases(Yen::new(1000), Yen::zero()).tax10.amount(), 100);
        assert_eq!(InvoiceTotals::from_bases(Yen::new(999), Yen::zero()).tax10.amount(), 99);
        assert_eq!(InvoiceTotals::from_bases(Yen::zero(), Yen::new(1680)).tax8.amount(), 134);
    }

    #[test]
    fn test_two_rate_example() {
        let totals = InvoiceTotals::from_bases(Yen::new(1400), Yen::new(1680));
        assert_eq!(totals.tax10.amount(), 140);
        assert_eq!(totals.tax8.amount(), 134);
        assert_eq!(totals.grand_total.amount(), 3354);
    }

    #[test]
    fn test_empty_rows_are_all_zero() {
        assert_eq!(InvoiceTotals::from_grouped(&[]), InvoiceTotals::default());
    }

    #[test]
    fn test_rounding_is_not_per_line() {
        // Two 8% lines of ¥12 each: per-line floor would give 0 + 0,
        // bucket floor gives floor(24 × 0.08) = 1.
        let records = vec![SalesRecord::new(
            "x",
            date(2025, 4, 1),
            "中元",
            vec![
                LineItem::new(1, "a", Yen::new(12), TaxRate::Reduced, 1, 0),
                LineItem::new(2, "b", Yen::new(12), TaxRate::Reduced, 1, 0),
            ],
            TaxRate::Standard,
        )];
        let rows = group_products_for_period(&records, Period::Day(date(2025, 4, 1)));
        assert_eq!(InvoiceTotals::from_grouped(&rows).tax8.amount(), 1);
    }

    #[test]
    fn test_build_daily_invoice() {
        let invoice = Invoice::build(
            Period::Day(date(2025, 4, 1)),
            &demo_sales_history(),
            &CompanyInfo::default(),
            date(2025, 4, 1),
        )
        .unwrap();

        assert_eq!(invoice.number, "INV-20250401");
        assert_eq!(invoice.due_date, date(2026, 12, 31));
        assert_eq!(invoice.lines.len(), 3);

        // 中辛 1400 + 匠 1775 at 10%, 乳酸菌 1680 at 8%
        assert_eq!(invoice.totals.tax10_base.amount(), 3175);
        assert_eq!(invoice.totals.tax10.amount(), 317);
        assert_eq!(invoice.totals.tax8_base.amount(), 1680);
        assert_eq!(invoice.totals.tax8.amount(), 134);
        assert_eq!(invoice.totals.grand_total.amount(), 3175 + 317 + 1680 + 134);

        assert_eq!(invoice.recorded.subtotal.amount(), 4855);
        assert_eq!(invoice.recorded.total.amount(), 5340);

        let reduced: Vec<&str> = invoice
            .lines
            .iter()
            .filter(|l| l.reduced_rate)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(reduced, vec!["乳酸菌"]);
        assert_eq!(invoice.client.address, "〒890-1234 東京都□□区△△4-5-6");
    }

    #[test]
    fn test_build_monthly_invoice() {
        let invoice = Invoice::build(
            Period::Month("2025-04".parse().unwrap()),
            &demo_sales_history(),
            &CompanyInfo::default(),
            date(2025, 5, 1),
        )
        .unwrap();

        assert_eq!(invoice.number, "INV-202504");
        assert_eq!(invoice.period, "2025-04");
        let base = invoice.totals.tax10_base + invoice.totals.tax8_base;
        assert_eq!(base.amount(), 4855 + 6680 + 6555 + 8640 + 11025);
    }

    #[test]
    fn test_build_without_records_fails() {
        let result = Invoice::build(
            Period::Month("2025-05".parse().unwrap()),
            &demo_sales_history(),
            &CompanyInfo::default(),
            date(2025, 6, 1),
        );
        assert!(matches!(result, Err(CoreError::NoRecordsForPeriod(p)) if p == "2025-05"));
    }

    #[test]
    fn test_due_date_is_end_of_next_year() {
        assert_eq!(due_date_for(date(2025, 1, 1)), date(2026, 12, 31));
        assert_eq!(due_date_for(date(2025, 12, 31)), date(2026, 12, 31));
        assert_eq!(due_date_for(NaiveDate::MAX), NaiveDate::MAX);
    }
}
