//! Presentation components.
//!
//! Pure functions from view models to HTML strings: no fetching, no side
//! effects. Text from the backend is escaped except product descriptions,
//! which are trusted rich text.

pub mod html;
pub mod layout;
pub mod listing;
pub mod pages;
pub mod product;

pub use layout::layout;
