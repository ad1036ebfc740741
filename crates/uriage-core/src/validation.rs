//! Field checks applied before anything is stored or aggregated.
//!
//! Request bodies are already typed by serde when they get here, so only
//! business rules remain: non-blank names, sane quantities, a well formed
//! registration number, totals that agree with their line items.
//! Aggregation and invoice code trust anything that passed and have no
//! error paths of their own.

use crate::error::ValidationError;
use crate::money::Yen;
use crate::types::{LineItem, SalesRecord};
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LENGTH, MAX_UNIT_PRICE};

pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_RECORDER_LENGTH: usize = 50;
const REGISTRATION_DIGITS: usize = 13;

fn non_blank(field: &str, value: &str, max_chars: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    // Counted in chars; a kanji name is three bytes per character
    if value.chars().count() > max_chars {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: max_chars,
        });
    }
    Ok(())
}

fn not_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Fields
// =============================================================================

/// 作成者 on a daily entry.
///
/// ```rust
/// use uriage_core::validation::validate_recorder;
///
/// assert!(validate_recorder("中元").is_ok());
/// assert!(validate_recorder("   ").is_err());
/// ```
pub fn validate_recorder(recorder: &str) -> ValidationResult<()> {
    non_blank("recorder", recorder, MAX_RECORDER_LENGTH)
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    non_blank("name", name, MAX_NAME_LENGTH)
}

/// 適格請求書発行事業者の登録番号: `T` and 13 digits.
///
/// ```rust
/// use uriage_core::validation::validate_registration_number;
///
/// assert!(validate_registration_number("T1234567890123").is_ok());
/// assert!(validate_registration_number("1234567890123").is_err());
/// assert!(validate_registration_number("T12345").is_err());
/// ```
pub fn validate_registration_number(number: &str) -> ValidationResult<()> {
    let well_formed = number.trim().strip_prefix('T').is_some_and(|digits| {
        digits.len() == REGISTRATION_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
    });

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "registrationNumber".to_string(),
            reason: format!("expected 'T' followed by {REGISTRATION_DIGITS} digits"),
        })
    }
}

/// Zero is accepted and means "not made today"; the entry builder drops
/// such rows.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if (0..=MAX_ITEM_QUANTITY).contains(&qty) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        })
    }
}

pub fn validate_work_time(minutes: i64) -> ValidationResult<()> {
    not_negative("workTimeMinutes", minutes)
}

pub fn validate_unit_price(price: Yen) -> ValidationResult<()> {
    not_negative("unitPrice", price.amount())?;
    if price.amount() > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "unitPrice".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }
    Ok(())
}

// =============================================================================
// Whole records
// =============================================================================

/// Field checks plus `subtotal == unit_price × quantity`.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_product_name(&item.name)?;
    validate_unit_price(item.unit_price)?;
    validate_quantity(item.quantity)?;
    validate_work_time(item.work_time_minutes)?;

    agrees(
        "subtotal",
        item.unit_price.multiply_quantity(item.quantity),
        item.subtotal,
    )
}

/// Checks a record built elsewhere (seed data, a stored row, a client)
/// before aggregation relies on it. Totals must be exactly what the record
/// rules would produce: sum of lines, floor-rounded tax, their sum.
pub fn validate_record(record: &SalesRecord) -> ValidationResult<()> {
    validate_recorder(&record.recorder)?;
    record.line_items.iter().try_for_each(validate_line_item)?;

    let subtotal: Yen = record.line_items.iter().map(|item| item.subtotal).sum();
    let tax = subtotal.floor_tax(record.tax_rate);

    agrees("subtotal", subtotal, record.subtotal)?;
    agrees("tax", tax, record.tax)?;
    agrees("total", subtotal + tax, record.total)
}

fn agrees(field: &str, expected: Yen, actual: Yen) -> ValidationResult<()> {
    if expected == actual {
        return Ok(());
    }
    Err(ValidationError::Inconsistent {
        field: field.to_string(),
        expected: expected.amount(),
        actual: actual.amount(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
