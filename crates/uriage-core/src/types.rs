//! # Domain Types
//!
//! Core domain types used throughout Uriage.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │   SalesRecord   │   │      LineItem       │   │    TaxRate      │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │ 1:N  product_id          │   │  Reduced (8%)   │   │
//! │  │  date           │──►│  name               │   │  Standard (10%) │   │
//! │  │  recorder       │   │  unit_price × qty   │   └─────────────────┘   │
//! │  │  subtotal/tax   │   │  work_time_minutes  │                         │
//! │  │  total          │   │  subtotal           │   ┌─────────────────┐   │
//! │  └─────────────────┘   └─────────────────────┘   │ YearMonth/Period│   │
//! │                                                  │  "2025-04"      │   │
//! │                                                  └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! A `SalesRecord` is built once when the daily entry is saved and never
//! mutated afterwards. Reports are always recomputed from the record set.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Yen;

// =============================================================================
// Tax Rate
// =============================================================================

/// Japanese consumption tax rate.
///
/// Only two rates exist in this domain. Serialized as the bare percentage
/// number (`8` or `10`) so stored JSON and API bodies stay readable.
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │  Reduced  = 8%   food (軽減税率)              │
/// │  Standard = 10%  everything else             │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaxRate {
    Reduced,
    #[default]
    Standard,
}

impl TaxRate {
    /// The rate as an integer percentage.
    #[inline]
    pub const fn percent(&self) -> u8 {
        match self {
            TaxRate::Reduced => 8,
            TaxRate::Standard => 10,
        }
    }

    #[inline]
    pub const fn is_reduced(&self) -> bool {
        matches!(self, TaxRate::Reduced)
    }

    /// Parses a percentage, accepting only 8 or 10.
    pub fn from_percent(percent: u8) -> Result<Self, ValidationError> {
        match percent {
            8 => Ok(TaxRate::Reduced),
            10 => Ok(TaxRate::Standard),
            _ => Err(ValidationError::NotAllowed {
                field: "tax_rate".to_string(),
                allowed: vec!["8".to_string(), "10".to_string()],
            }),
        }
    }
}

impl TryFrom<u8> for TaxRate {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TaxRate::from_percent(value)
    }
}

impl From<TaxRate> for u8 {
    fn from(rate: TaxRate) -> u8 {
        rate.percent()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product row inside a saved sales record.
///
/// Name, price and tax rate are snapshots taken from the catalog at save
/// time, so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: u32,
    pub name: String,
    pub unit_price: Yen,
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
    pub quantity: i64,
    pub work_time_minutes: i64,
    /// Always `unit_price × quantity`.
    pub subtotal: Yen,
}

impl LineItem {
    /// Builds a line item, computing the subtotal.
    pub fn new(
        product_id: u32,
        name: impl Into<String>,
        unit_price: Yen,
        tax_rate: TaxRate,
        quantity: i64,
        work_time_minutes: i64,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            tax_rate,
            quantity,
            work_time_minutes,
            subtotal: unit_price.multiply_quantity(quantity),
        }
    }
}

// =============================================================================
// Sales Record
// =============================================================================

/// One day's saved sales entry.
///
/// ## Derived Figures
/// ```text
/// subtotal = Σ line_items.subtotal
/// tax      = floor(subtotal × tax_rate / 100)
/// total    = subtotal + tax
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub recorder: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: Yen,
    pub tax: Yen,
    pub total: Yen,
    #[ts(as = "u8")]
    pub tax_rate: TaxRate,
}

impl SalesRecord {
    /// Builds a record from its line items, computing subtotal, tax and total.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        recorder: impl Into<String>,
        line_items: Vec<LineItem>,
        tax_rate: TaxRate,
    ) -> Self {
        let subtotal: Yen = line_items.iter().map(|item| item.subtotal).sum();
        let tax = subtotal.floor_tax(tax_rate);
        Self {
            id: id.into(),
            date,
            recorder: recorder.into(),
            line_items,
            subtotal,
            tax,
            total: subtotal + tax,
            tax_rate,
        }
    }

    /// The calendar month this record belongs to.
    #[inline]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    /// Total units produced across all line items.
    pub fn product_count(&self) -> i64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Year-Month Key
// =============================================================================

/// A calendar month, rendered as `YYYY-MM`.
///
/// Ordering is chronological, so a `BTreeMap<YearMonth, _>` iterates
/// months oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            });
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "year_month".to_string(),
            reason: format!("expected YYYY-MM, got '{s}'"),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> String {
        ym.to_string()
    }
}

// =============================================================================
// Period
// =============================================================================

/// A reporting window: one exact day, or one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day(NaiveDate),
    Month(YearMonth),
}

impl Period {
    /// Whether `date` falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::Day(day) => *day == date,
            Period::Month(ym) => ym.contains(date),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Period::Month(ym) => write!(f, "{ym}"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
