//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are held as [`Decimal`] so that cart subtotals never accumulate
//! floating point error, but they are stored on the device as plain JSON
//! numbers (`"price": 10.5`) to stay compatible with the persisted cart
//! format.
//!
//! Every unit price is normalized on construction to the shortest decimal
//! that names the same `f64`. A stored number therefore decodes to exactly
//! the price that was encoded, and a price re-encodes to the same number.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// A unit price in the store's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price, rounded to what a JSON number can carry.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self::from_f64(decimal_to_f64(amount)).unwrap_or(Self(amount))
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// Create a price from a JSON-style number.
    ///
    /// Returns `None` for non-finite values and for magnitudes outside the
    /// range of [`Decimal`].
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // `f64`'s Display is the shortest string that parses back to `value`.
        Decimal::from_str(&value.to_string()).ok().map(Self)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount as stored on the device.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        decimal_to_f64(self.0)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * Decimal::from(quantity.get()))
    }
}

fn decimal_to_f64(amount: Decimal) -> f64 {
    amount.to_string().parse().unwrap_or_default()
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_f64(value)
            .ok_or_else(|| D::Error::custom(format!("price {value} is out of range")))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self::new)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_json_number() {
        let price = Price::from_cents(1999);
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.99");
    }

    #[test]
    fn test_price_deserializes_integer_and_float() {
        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole, Price::from_cents(1000));

        let fractional: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(fractional, Price::from_cents(1999));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_price_times_quantity() {
        let unit = Price::from_cents(250);
        let qty = Quantity::new(3).unwrap();
        assert_eq!(unit.times(qty), Price::from_cents(750));
    }

    #[test]
    fn test_price_parse() {
        assert_eq!("12.50".parse::<Price>().unwrap(), Price::from_cents(1250));
        assert!("twelve".parse::<Price>().is_err());
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_high_precision_price_is_normalized() {
        let price: Price = "0.1234567890123456789".parse().unwrap();
        assert_eq!(price.amount(), Decimal::from_str("0.12345678901234568").unwrap());

        let decoded: Price = serde_json::from_str(&serde_json::to_string(&price).unwrap()).unwrap();
        assert_eq!(decoded, price);
    }

    #[test]
    fn test_stored_number_reencodes_unchanged() {
        let price: Price = serde_json::from_str("123456789.123456789").unwrap();
        let stored = serde_json::to_string(&price).unwrap();

        let reloaded: Price = serde_json::from_str(&stored).unwrap();
        assert_eq!(reloaded, price);
        assert_eq!(serde_json::to_string(&reloaded).unwrap(), stored);
        assert_eq!(Price::new(price.amount()), price);
    }

    #[test]
    fn test_out_of_range_number_is_rejected() {
        let err = serde_json::from_str::<Price>("1e30").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(Price::from_f64(f64::NAN).is_none());
    }
}
