//! # Domain Errors
//!
//! ```text
//!   ValidationError   one field of an entry, product or company record is bad
//!        │ #[from]
//!        ▼
//!   CoreError         an operation on sales data cannot proceed
//!        │
//!        ▼
//!   ApiError          (apps/server) status code + JSON body
//! ```
//!
//! Record store failures live in `uriage-db` as `DbError` and never pass
//! through `CoreError`.

use thiserror::Error;

// =============================================================================
// CoreError
// =============================================================================

#[derive(Debug, Error)]
pub enum CoreError {
    /// ## When This Occurs
    /// - A daily entry names a product removed from the catalog meanwhile
    /// - Editing or deleting an id the catalog never had
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Every quantity on the entry form was zero.
    ///
    /// Shown to the operator as
    /// "少なくとも1つの商品の数量を入力してください".
    #[error("Entry has no product with a positive quantity")]
    EmptyEntry,

    /// Invoice requested for a day or month without a single sale.
    #[error("No sales recorded for {0}")]
    NoRecordsForPeriod(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// ValidationError
// =============================================================================

/// A single field failed a check. `field` uses the JSON name the client
/// sent, so the message can be shown next to the offending input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be within {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Unparseable date, year-month or registration number.
    #[error("{field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} accepts only {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A stored total that does not match its own line items.
    #[error("{field} should be {expected} but is {actual}")]
    Inconsistent {
        field: String,
        expected: i64,
        actual: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_messages() {
        assert_eq!(CoreError::ProductNotFound(42).to_string(), "Product not found: 42");
        assert_eq!(
            CoreError::NoRecordsForPeriod("2025-05".to_string()).to_string(),
            "No sales recorded for 2025-05"
        );
    }

    #[test]
    fn test_validation_is_transparent_inside_core_error() {
        let err: CoreError = ValidationError::Inconsistent {
            field: "subtotal".to_string(),
            expected: 4855,
            actual: 4800,
        }
        .into();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "subtotal should be 4855 but is 4800");
    }

    #[test]
    fn test_field_first_messages() {
        let err = ValidationError::Required {
            field: "recorder".to_string(),
        };
        assert_eq!(err.to_string(), "recorder is required");

        let err = ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        };
        assert_eq!(err.to_string(), "month must be within 1..=12");
    }
}
