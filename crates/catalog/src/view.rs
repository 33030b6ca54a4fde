//! View models handed to the presentation layer. Built per request, never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storefront_core::{CategoryId, Price, ProductId};

/// A resolved category reference: the display name plus the id for linking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTag {
    pub id: CategoryId,
    pub name: String,
}

/// A product with every reference resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Trusted rich text; rendered as-is.
    pub description: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    /// Positionally matched to the record's category references.
    pub categories: Vec<CategoryTag>,
}

impl NormalizedProduct {
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary image first, then the secondary images.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        self.image
            .as_deref()
            .into_iter()
            .chain(self.images.iter().map(String::as_str))
    }
}

/// Listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub thumbnail: Option<String>,
}

/// Products filtered by one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListing {
    pub category: CategoryTag,
    pub products: Vec<ProductSummary>,
}
