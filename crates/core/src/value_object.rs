//! Value objects: equality by value, not identity.
//!
//! Prices are the only one the storefront needs.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// A product price in minor currency units (e.g. cents).
///
/// The content backend stores prices as decimals. They arrive either as JSON
/// numbers or as decimal strings (`"19.99"`), depending on the field type.
/// Stored as an integer so formatting never drifts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    minor_units: u64,
}

impl Price {
    pub fn from_minor_units(minor_units: u64) -> Self {
        Self { minor_units }
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    /// Plain decimal form, e.g. `19.99`. This is what the cart widget expects.
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }

    fn from_f64(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::invalid_price(value.to_string()));
        }
        let minor = (value * 100.0).round();
        // `u64::MAX as f64` rounds up to 2^64, which is itself out of range.
        if minor >= u64::MAX as f64 {
            return Err(DomainError::invalid_price(value.to_string()));
        }
        Ok(Self::from_minor_units(minor as u64))
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${}", self.to_decimal_string())
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DomainError::invalid_price(s.to_string());

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        // Anything past cents is rounded half-up.
        let mut cents = String::from(frac);
        cents.push_str("000");
        let (kept, rest) = cents.split_at(2);
        let mut minor: u64 = kept.parse().map_err(|_| invalid())?;
        if rest.starts_with(|c: char| c >= '5') {
            minor += 1;
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(minor))
            .map(Self::from_minor_units)
            .ok_or_else(invalid)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePrice {
    Text(String),
    Int(u64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let price = match WirePrice::deserialize(deserializer)? {
            WirePrice::Text(s) => s.parse(),
            WirePrice::Int(n) => n
                .checked_mul(100)
                .map(Price::from_minor_units)
                .ok_or_else(|| DomainError::invalid_price(n.to_string())),
            WirePrice::Float(f) => Price::from_f64(f),
        };
        price.map_err(serde::de::Error::custom)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("19.99".parse::<Price>().unwrap().minor_units(), 1999);
        assert_eq!("5".parse::<Price>().unwrap().minor_units(), 500);
        assert_eq!("5.5".parse::<Price>().unwrap().minor_units(), 550);
        assert_eq!("0.125".parse::<Price>().unwrap().minor_units(), 13);
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Price>().is_err());
        assert!("-1.00".parse::<Price>().is_err());
        assert!("1.2.3".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn accepts_json_numbers_and_strings() {
        let p: Price = serde_json::from_str("24.5").unwrap();
        assert_eq!(p.to_decimal_string(), "24.50");
        let p: Price = serde_json::from_str("30").unwrap();
        assert_eq!(p.minor_units(), 3000);
        let p: Price = serde_json::from_str("\"12.00\"").unwrap();
        assert_eq!(p.to_string(), "$12.00");
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn out_of_range_numbers_are_rejected_not_clamped() {
        assert!(serde_json::from_str::<Price>("1e300").is_err());
        assert!(serde_json::from_str::<Price>("18446744073709551615").is_err());
        assert!("18446744073709551615.00".parse::<Price>().is_err());

        let p: Price = serde_json::from_str("1000000.25").unwrap();
        assert_eq!(p.minor_units(), 100_000_025);
    }

    proptest! {
        #[test]
        fn decimal_string_parses_back(minor in 0u64..10_000_000_000) {
            let price = Price::from_minor_units(minor);
            prop_assert_eq!(price.to_decimal_string().parse::<Price>().unwrap(), price);
        }
    }
}
