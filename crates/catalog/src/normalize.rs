//! Product normalization: raw backend records → view models.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, instrument};

use storefront_content::{
    ContentClient, ContentError, ContentResult, ItemQuery, fetch_by_id, fetch_where,
};
use storefront_core::{CategoryId, ProductId};

use crate::assets::AssetResolver;
use crate::product::{Category, ProductRecord, ProductSummaryRecord, Reference};
use crate::view::{CategoryListing, CategoryTag, NormalizedProduct, ProductSummary};

/// Reshape a product record whose categories have already been resolved.
///
/// `categories` must be positionally matched to `record.categories`.
pub fn normalize(
    record: ProductRecord,
    categories: Vec<Category>,
    assets: &AssetResolver,
) -> NormalizedProduct {
    debug_assert_eq!(record.categories.len(), categories.len());

    let image = record.image.as_ref().map(|r| assets.original(r.id()));
    let thumbnail = record.image.as_ref().map(|r| assets.thumbnail(r.id()));

    NormalizedProduct {
        id: record.id,
        name: record.name,
        price: record.price,
        description: record.description.unwrap_or_default(),
        date_created: record.date_created,
        date_updated: record.date_updated,
        image,
        thumbnail,
        images: record.images.iter().map(|r| assets.original(r.id())).collect(),
        categories: categories
            .into_iter()
            .map(|c| CategoryTag {
                id: c.id,
                name: c.name,
            })
            .collect(),
    }
}

fn dangling(err: ContentError) -> ContentError {
    match err {
        ContentError::NotFound { collection, id } => {
            ContentError::Malformed(format!("dangling reference to {collection}/{id}"))
        }
        other => other,
    }
}

fn summarize(record: ProductSummaryRecord, assets: &AssetResolver) -> ProductSummary {
    ProductSummary {
        thumbnail: record.image.as_ref().map(|r| assets.thumbnail(r.id())),
        id: record.id,
        name: record.name,
        price: record.price,
    }
}

/// Data loader for product pages.
#[derive(Clone)]
pub struct Normalizer {
    client: Arc<dyn ContentClient>,
    assets: AssetResolver,
}

impl Normalizer {
    pub fn new(client: Arc<dyn ContentClient>, assets: AssetResolver) -> Self {
        Self { client, assets }
    }

    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    /// Fetch a product and resolve all of its references.
    ///
    /// Category lookups run concurrently, one per reference, and are joined
    /// all-or-nothing: the first failed lookup fails the whole call. Only a
    /// missing product is reported as `NotFound`; a reference to a missing
    /// category is a broken record and comes back as `Malformed`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> ContentResult<NormalizedProduct> {
        let record: ProductRecord = fetch_by_id(self.client.as_ref(), id.as_str()).await?;
        let categories = self.resolve_categories(&record.categories).await?;
        debug!(
            categories = categories.len(),
            images = record.images.len(),
            "product resolved"
        );
        Ok(normalize(record, categories, &self.assets))
    }

    /// Resolve references in input order. Repeated ids are looked up again.
    pub async fn resolve_categories(
        &self,
        refs: &[Reference<CategoryId>],
    ) -> ContentResult<Vec<Category>> {
        let client = self.client.as_ref();
        try_join_all(refs.iter().map(|r| async move {
            fetch_by_id::<Category>(client, r.id().as_str())
                .await
                .map_err(dangling)
        }))
        .await
    }

    /// All products, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ContentResult<Vec<ProductSummary>> {
        let query = ItemQuery::new().sort("-date_created").unlimited();
        let records: Vec<ProductSummaryRecord> =
            fetch_where(self.client.as_ref(), query).await?;
        Ok(records
            .into_iter()
            .map(|r| summarize(r, &self.assets))
            .collect())
    }

    /// A category and the products tagged with it.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category_listing(&self, id: &CategoryId) -> ContentResult<CategoryListing> {
        let client = self.client.as_ref();
        let query = ItemQuery::new()
            .filter_eq("categories.categories_id", id.as_str())
            .sort("-date_created")
            .unlimited();

        let (category, records) = futures::try_join!(
            fetch_by_id::<Category>(client, id.as_str()),
            fetch_where::<ProductSummaryRecord>(client, query),
        )?;

        Ok(CategoryListing {
            category: CategoryTag {
                id: category.id,
                name: category.name,
            },
            products: records
                .into_iter()
                .map(|r| summarize(r, &self.assets))
                .collect(),
        })
    }
}
