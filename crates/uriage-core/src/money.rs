//! # Yen
//!
//! Whole-yen amounts and the one rounding rule the business uses.
//!
//! ```text
//!   tax = floor(base × percent / 100)
//!
//!   base    rate   exact     charged
//!   1000    10%    100.0     100
//!    999    10%     99.9      99
//!   1680     8%    134.4     134
//! ```
//!
//! The division is done on integers. A float `base * 0.08` can come out a
//! hair under the true value and `floor` would then lose a yen.
//!
//! ```rust
//! use uriage_core::money::Yen;
//! use uriage_core::types::TaxRate;
//!
//! let subtotal = Yen::new(175).multiply_quantity(8);
//! let tax = subtotal.floor_tax(TaxRate::Standard);
//! assert_eq!((subtotal + tax).amount(), 1540);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Amount in yen. Serialized as a bare JSON number.
///
/// Signed so a correction can go below zero; validation keeps prices and
/// quantities non-negative.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Yen(i64);

impl Yen {
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Yen(amount)
    }

    #[inline]
    pub const fn zero() -> Self {
        Yen(0)
    }

    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Line subtotal: unit price × quantity, exact.
    ///
    /// ```rust
    /// use uriage_core::money::Yen;
    ///
    /// assert_eq!(Yen::new(140).multiply_quantity(12).amount(), 1680);
    /// ```
    ///
    /// Saturates instead of wrapping; validated prices and quantities never
    /// get near the limit.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Yen(self.0.saturating_mul(qty))
    }

    /// Consumption tax on this base, rounded toward negative infinity.
    ///
    /// Call it once on a summed base (a record subtotal, an invoice
    /// bucket). Taxing each line and adding would round several times.
    pub fn floor_tax(&self, rate: TaxRate) -> Yen {
        let scaled = i128::from(self.0) * i128::from(rate.percent());
        // |scaled / 100| < |self.0|, so the result fits back into i64
        Yen(scaled.div_euclid(100) as i64)
    }
}

/// `¥1,234`, or `-¥500`.
impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "¥{}", group_thousands(self.0.unsigned_abs()))
    }
}

impl Add for Yen {
    type Output = Yen;
    fn add(self, rhs: Yen) -> Yen {
        Yen(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Yen {
    fn add_assign(&mut self, rhs: Yen) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Yen {
    type Output = Yen;
    fn sub(self, rhs: Yen) -> Yen {
        Yen(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Yen {
    type Output = Yen;
    fn mul(self, qty: i64) -> Yen {
        self.multiply_quantity(qty)
    }
}

impl Sum for Yen {
    fn sum<I: Iterator<Item = Yen>>(iter: I) -> Yen {
        iter.fold(Yen::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Yen> for Yen {
    fn sum<I: Iterator<Item = &'a Yen>>(iter: I) -> Yen {
        iter.copied().fold(Yen::zero(), Add::add)
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.char_indices() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal_is_exact_product() {
        for (price, qty) in [(175, 8), (140, 12), (355, 5), (0, 30), (685, 0)] {
            assert_eq!(Yen::new(price).multiply_quantity(qty).amount(), price * qty);
        }
    }

    #[test]
    fn test_floor_tax_standard() {
        assert_eq!(Yen::new(1000).floor_tax(TaxRate::Standard).amount(), 100);
        assert_eq!(Yen::new(999).floor_tax(TaxRate::Standard).amount(), 99);
        assert_eq!(Yen::new(4855).floor_tax(TaxRate::Standard).amount(), 485);
    }

    #[test]
    fn test_floor_tax_reduced() {
        assert_eq!(Yen::new(1680).floor_tax(TaxRate::Reduced).amount(), 134);
        assert_eq!(Yen::new(12).floor_tax(TaxRate::Reduced).amount(), 0);
        assert_eq!(Yen::new(25).floor_tax(TaxRate::Reduced).amount(), 2);
    }

    #[test]
    fn test_floor_tax_zero_base() {
        assert!(Yen::zero().floor_tax(TaxRate::Standard).is_zero());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Yen::new(0).to_string(), "¥0");
        assert_eq!(Yen::new(999).to_string(), "¥999");
        assert_eq!(Yen::new(4855).to_string(), "¥4,855");
        assert_eq!(Yen::new(1234567).to_string(), "¥1,234,567");
        assert_eq!(Yen::new(-1500).to_string(), "-¥1,500");
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Yen::new(1400), Yen::new(1680), Yen::new(1775)];
        let by_ref: Yen = amounts.iter().sum();
        let by_value: Yen = amounts.into_iter().sum();
        assert_eq!(by_ref.amount(), 4855);
        assert_eq!(by_value, by_ref);
    }

    #[test]
    fn test_arithmetic() {
        let a = Yen::new(1000);
        let b = Yen::new(250);
        assert_eq!((a + b).amount(), 1250);
        assert_eq!((a - b).amount(), 750);
        assert_eq!((b * 4).amount(), 1000);

        let mut acc = Yen::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.amount(), 1250);
    }

    #[test]
    fn test_overflow_saturates() {
        let huge = Yen::new(i64::MAX / 2 + 1);
        assert_eq!(huge.multiply_quantity(2).amount(), i64::MAX);
        assert_eq!((huge + huge).amount(), i64::MAX);

        let total: Yen = [huge, huge, Yen::new(1)].iter().sum();
        assert_eq!(total.amount(), i64::MAX);
        assert_eq!(Yen::new(i64::MAX).floor_tax(TaxRate::Standard).amount(), i64::MAX / 10);
    }
}
