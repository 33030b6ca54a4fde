//! Catalog: product/category records and their normalization into view models.
//!
//! Records are owned by the content backend; this crate only reads and
//! reshapes them.

pub mod assets;
pub mod normalize;
pub mod product;
pub mod view;

pub use assets::{AssetResolver, Fit, THUMBNAIL, Transform};
pub use normalize::{Normalizer, normalize};
pub use product::{Category, ProductRecord, ProductSummaryRecord, Reference};
pub use view::{CategoryListing, CategoryTag, NormalizedProduct, ProductSummary};
