//! `storefront-content`: read access to the headless content backend.
//!
//! One network read per call. No retries and no caching: the backend is
//! assumed reliable at storefront scale.

pub mod client;
pub mod error;
pub mod http;
pub mod in_memory;

pub use client::{ContentClient, ItemQuery, Limit, Resource, fetch_by_id, fetch_where};
pub use error::{ContentError, ContentResult};
pub use http::HttpContentClient;
pub use in_memory::InMemoryContentClient;
