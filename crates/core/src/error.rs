//! Errors raised while parsing catalog values.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A value coming from the content backend or a URL could not be accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Empty, or not usable as a single URL path segment.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Negative, non-numeric or out of range.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_rejected_value() {
        assert_eq!(
            DomainError::invalid_price("-1").to_string(),
            "invalid price: -1"
        );
        assert_eq!(
            DomainError::invalid_id("product: \"a/b\"").to_string(),
            "invalid identifier: product: \"a/b\""
        );
    }
}
