use thiserror::Error;

use storefront_content::ContentError;

use crate::session::TokenValidationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected the request or could not be reached.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// The provider's profile did not carry a usable subject id.
    #[error("invalid provider profile: {0}")]
    Profile(String),

    /// Session token could not be encoded or decoded.
    #[error("session token error: {0}")]
    Token(String),

    #[error("session claims rejected: {0}")]
    Claims(#[from] TokenValidationError),

    /// Persisting or looking up the user record failed.
    #[error("user store error: {0}")]
    Content(#[from] ContentError),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        Self::Provider(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Token(e.to_string())
    }
}
