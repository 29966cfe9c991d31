//! Type-safe price representation using exact decimal arithmetic.
//!
//! Catalog prices are stored and summed as `rust_decimal::Decimal` so that
//! `5.00 + 1.00` is exactly `6.00` with no floating point drift. The scale of
//! the inputs is preserved; rounding only happens when a [`Rounding`] rule
//! asks for it.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount in the store currency.
///
/// ## Examples
///
/// ```
/// use printfuse_core::Price;
/// use rust_decimal::Decimal;
///
/// let burger = Price::new(Decimal::new(500, 2)).unwrap();
/// let cheese = Price::new(Decimal::new(100, 2)).unwrap();
///
/// assert_eq!(burger.checked_add(cheese).unwrap().to_string(), "6.00");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an integer number of minor units (e.g. cents).
    #[must_use]
    pub fn from_minor_units(units: u32, scale: u32) -> Self {
        Self(Decimal::new(i64::from(units), scale))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Add two prices, returning `None` on decimal overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Apply a rounding rule.
    #[must_use]
    pub fn rounded(self, rounding: Rounding) -> Self {
        match rounding {
            Rounding::Exact => self,
            Rounding::DecimalPlaces(dp) => Self(self.0.round_dp(dp)),
        }
    }

    /// Format for display with two decimals (e.g. `"6.00"`).
    ///
    /// Extra precision is rounded half away from zero, so `5.009` shows as
    /// `"5.01"`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Rounding rule applied to computed totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Keep the full precision of the inputs.
    #[default]
    Exact,
    /// Round to this many decimal places (banker's rounding).
    DecimalPlaces(u32),
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_new_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_checked_add_is_exact() {
        let a = Price::new(dec("0.10")).unwrap();
        let b = Price::new(dec("0.20")).unwrap();
        assert_eq!(a.checked_add(b).unwrap().amount(), dec("0.30"));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert!(max.checked_add(Price::from_minor_units(1, 0)).is_none());
    }

    #[test]
    fn test_preserves_scale() {
        let a = Price::new(dec("5.00")).unwrap();
        let b = Price::new(dec("1.005")).unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "6.005");
    }

    #[test]
    fn test_rounded() {
        let p = Price::new(dec("6.005")).unwrap();
        assert_eq!(p.rounded(Rounding::Exact), p);
        assert_eq!(p.rounded(Rounding::DecimalPlaces(2)).amount(), dec("6.00"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(dec("6")).unwrap().display(), "6.00");
        assert_eq!(Price::from_minor_units(1999, 2).display(), "19.99");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        assert_eq!(Price::new(dec("5.009")).unwrap().display(), "5.01");
        assert_eq!(Price::new(dec("0.125")).unwrap().display(), "0.13");
        assert_eq!(Price::new(dec("6.004")).unwrap().display(), "6.00");
    }

    #[test]
    fn test_serde_uses_strings() {
        let p = Price::new(dec("5.00")).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"5.00\"");

        let parsed: Price = serde_json::from_str("\"1.50\"").unwrap();
        assert_eq!(parsed.amount(), dec("1.50"));
    }

    #[test]
    fn test_serde_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-2.00\"").is_err());
    }
}
