use thiserror::Error;

pub type ContentResult<T> = Result<T, ContentError>;

/// Failure of a content backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The requested record does not exist.
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// Transport failure (connect, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered, but not with the shape we expected.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other non-success status.
    #[error("content API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ContentError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
