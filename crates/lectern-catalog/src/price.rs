//! Price type for complectation prices.
//!
//! The backend sends prices as decimal numbers. They are held as integer
//! cents so cart totals never accumulate floating-point error.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::CatalogError;

/// A non-negative price in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: i64,
}

impl Price {
    /// Zero price.
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Create a price from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use lectern_catalog::Price;
    /// let price = Price::from_decimal(49.99).unwrap();
    /// assert_eq!(price.cents(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, CatalogError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CatalogError::InvalidPrice(amount.to_string()));
        }
        let cents = (amount * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(CatalogError::Overflow);
        }
        Ok(Self::from_cents(cents as i64))
    }

    /// Amount in cents.
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Amount as a decimal number.
    pub fn to_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Add two prices, returning `None` on overflow.
    pub fn checked_add(&self, other: Price) -> Option<Price> {
        self.cents.checked_add(other.cents).map(Price::from_cents)
    }

    /// Sum prices, returning `None` on overflow.
    pub fn try_sum(iter: impl IntoIterator<Item = Price>) -> Option<Price> {
        iter.into_iter()
            .try_fold(Price::ZERO, |acc, price| acc.checked_add(price))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from_decimal() {
        assert_eq!(Price::from_decimal(10.5).unwrap().cents(), 1050);
        assert_eq!(Price::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Price::from_decimal(-1.0).is_err());
        assert!(Price::from_decimal(f64::NAN).is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(4999).to_string(), "49.99");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn test_price_serde_as_decimal() {
        let price: Price = serde_json::from_str("12.3").unwrap();
        assert_eq!(price.cents(), 1230);
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.3");
        let whole: Price = serde_json::from_str("7").unwrap();
        assert_eq!(whole.cents(), 700);
    }

    #[test]
    fn test_try_sum_overflow() {
        let prices = [Price::from_cents(i64::MAX), Price::from_cents(1)];
        assert!(Price::try_sum(prices).is_none());
    }
}
