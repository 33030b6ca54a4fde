//! `storefront-core`: identifiers and values shared by every storefront crate.
//!
//! Pure parsing and formatting; nothing here performs I/O.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{AssetId, CategoryId, ProductId, UserId};
pub use value_object::Price;
