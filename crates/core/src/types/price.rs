//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from the backend as JSON numbers and are kept as
//! `rust_decimal::Decimal` to avoid floating-point drift in cart
//! subtotal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single-currency price.
///
/// The backend is single-currency, so no currency code travels with the
/// amount; display formatting owns the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole currency-unit amount.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Extend the price over a line quantity.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(Price::from_units(500).to_string(), "$500.00");
        assert_eq!(
            Price::new(Decimal::new(1999, 2)).to_string(),
            "$19.99"
        );
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::from_units(500);
        assert_eq!(price.times(2), Decimal::from(1000));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("1200").unwrap();
        assert_eq!(price.amount(), Decimal::from(1200));

        let price: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }
}
