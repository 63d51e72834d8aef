//! Type-safe price representation using decimal arithmetic.
//!
//! Alto sells in a single currency (EUR), so a price is a decimal amount in
//! euros. Decimal arithmetic avoids the float rounding issues that plague
//! naive price handling.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in euros.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero euros.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount in euros.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Sum with another price.
    #[must_use]
    pub fn add(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Whether the amount is negative. Negative prices are always invalid input.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} €", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature): stored as NUMERIC
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
        Ok(Self(amount))
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

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(11_900);
        assert_eq!(price.amount(), Decimal::new(11_900, 2));
        assert_eq!(price.to_string(), "119.00 €");
    }

    #[test]
    fn test_line_total() {
        let price = Price::from_cents(2_450);
        assert_eq!(price.line_total(3), Price::from_cents(7_350));
        assert_eq!(price.line_total(0), Price::ZERO);
    }

    #[test]
    fn test_add() {
        let total = Price::from_cents(1_000).add(Price::from_cents(990));
        assert_eq!(total, Price::from_cents(1_990));
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_cents(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from_cents(100).is_negative());
    }

    #[test]
    fn test_serde_uses_string() {
        // serde-with-str keeps decimals exact over the wire
        let price = Price::from_cents(11_900);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"119.00\"");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
