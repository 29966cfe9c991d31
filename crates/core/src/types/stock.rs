//! On-hand stock level for a variant.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Stock`] level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// The count is below zero.
    #[error("stock cannot be negative (got {0})")]
    Negative(i64),
    /// The count does not fit the storage column.
    #[error("stock must be at most {max}")]
    TooLarge {
        /// Maximum storable stock.
        max: i64,
    },
}

/// A non-negative unit count.
///
/// Bounded by `i32::MAX` so it always fits an `INTEGER` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Stock(u32);

impl Stock {
    /// Largest storable stock level.
    pub const MAX: i64 = i32::MAX as i64;

    /// Create a stock level from a signed count.
    ///
    /// # Errors
    ///
    /// Returns `StockError::Negative` for counts below zero and
    /// `StockError::TooLarge` above [`Stock::MAX`].
    pub fn new(count: i64) -> Result<Self, StockError> {
        if count < 0 {
            return Err(StockError::Negative(count));
        }
        if count > Self::MAX {
            return Err(StockError::TooLarge { max: Self::MAX });
        }
        u32::try_from(count)
            .map(Self)
            .map_err(|_| StockError::TooLarge { max: Self::MAX })
    }

    /// Number of units on hand.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.0
    }

    /// Whether at least one unit is on hand.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Stock {
    type Error = StockError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stock> for i64 {
    fn from(stock: Stock) -> Self {
        Self::from(stock.0)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Stock {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Stock {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let count = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(i64::from(count))?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Stock {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        // Bounded by `Stock::MAX` at construction.
        let count = i32::try_from(self.0)?;
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&count, buf)
    }
}
