//! Strongly-typed identifiers used across the storefront.
//!
//! The content backend owns identity, so identifiers are opaque strings. Some
//! collections use integer keys; those are accepted on the wire and kept in
//! their decimal form.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Identifier of a product record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a category record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

/// Backend-assigned identifier of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a stored media file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

/// Identifiers end up in URL paths, so reject anything that would change the path.
fn validate(raw: &str, name: &str) -> Result<(), DomainError> {
    if raw.is_empty() {
        return Err(DomainError::invalid_id(format!("{name}: empty")));
    }
    if raw
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(DomainError::invalid_id(format!("{name}: {raw:?}")));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Int(u64),
}

macro_rules! impl_string_id {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Parse and validate an identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                validate(&raw, $name)?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = match WireId::deserialize(deserializer)? {
                    WireId::Text(s) => s,
                    WireId::Int(n) => n.to_string(),
                };
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_string_id!(ProductId, "ProductId");
impl_string_id!(CategoryId, "CategoryId");
impl_string_id!(UserId, "UserId");
impl_string_id!(AssetId, "AssetId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_and_short_keys() {
        assert!(ProductId::new("p1").is_ok());
        assert!(AssetId::new("4f6c1a0e-5b4e-4b7a-9c55-0d3b1f0f2a11").is_ok());
    }

    #[test]
    fn rejects_path_breaking_ids() {
        assert!(matches!(ProductId::new(""), Err(DomainError::InvalidId(_))));
        assert!(CategoryId::new("../admin").is_err());
        assert!(CategoryId::new("a b").is_err());
        assert!(UserId::new("x?y=1").is_err());
    }

    #[test]
    fn deserializes_integer_keys() {
        let id: CategoryId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");

        let id: CategoryId = serde_json::from_str("\"c1\"").unwrap();
        assert_eq!(id.to_string(), "c1");
    }
}
