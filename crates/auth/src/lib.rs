//! `storefront-auth`: OAuth sign-in and signed sessions.
//!
//! This crate is decoupled from HTTP routing: the web layer drives the flow
//! and owns cookies.

pub mod error;
pub mod provider;
pub mod session;
pub mod user;

pub use error::AuthError;
pub use provider::{HttpIdentityProvider, IdentityProvider, OAuthProvider, ProviderProfile};
pub use session::{
    Session, SessionClaims, SessionKeys, SessionUser, TokenValidationError, validate_claims,
};
pub use user::{UserRecord, sign_in, upsert_user};
