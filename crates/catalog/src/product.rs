use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use storefront_content::Resource;
use storefront_core::{AssetId, CategoryId, Price, ProductId};

/// A foreign key as the backend returns it.
///
/// Depending on how deep the read expanded relations, a reference arrives as a
/// bare id (`"c1"`), as the related record (`{"id": "c1", ...}`) or as an M2M
/// junction row (`{"categories_id": "c1"}`). All three collapse to the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference<Id>(pub Id);

impl<Id> Reference<Id> {
    pub fn id(&self) -> &Id {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRef<Id> {
    Bare(Id),
    CategoryJunction { categories_id: Box<WireRef<Id>> },
    FileJunction { directus_files_id: Box<WireRef<Id>> },
    Record { id: Id },
}

impl<Id> WireRef<Id> {
    fn into_id(self) -> Id {
        match self {
            WireRef::Bare(id) | WireRef::Record { id } => id,
            WireRef::CategoryJunction { categories_id: inner }
            | WireRef::FileJunction { directus_files_id: inner } => inner.into_id(),
        }
    }
}

impl<'de, Id: Deserialize<'de>> Deserialize<'de> for Reference<Id> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireRef::deserialize(deserializer).map(|r| Reference(r.into_id()))
    }
}

/// Relations that were never set come back as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw product record, with relations expanded one level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Rich text (HTML) authored in the backend.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<Reference<AssetId>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<Reference<AssetId>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Reference<CategoryId>>,
}

impl Resource for ProductRecord {
    const COLLECTION: &'static str = "products";
    const FIELDS: &'static [&'static str] = &[
        "*",
        "images.directus_files_id",
        "categories.categories_id",
    ];
}

/// The subset of a product needed for listing cards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummaryRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<Reference<AssetId>>,
}

impl Resource for ProductSummaryRecord {
    const COLLECTION: &'static str = "products";
    const FIELDS: &'static [&'static str] = &["id", "name", "price", "image"];
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Resource for Category {
    const COLLECTION: &'static str = "categories";
    const FIELDS: &'static [&'static str] = &["id", "name"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn references_collapse_from_every_wire_shape() {
        let record: ProductRecord = serde_json::from_value(json!({
            "id": "p1",
            "name": "Runner",
            "price": "89.00",
            "image": "img1",
            "images": [{"directus_files_id": "img2"}, {"directus_files_id": {"id": "img3"}}],
            "categories": [{"id": "c1"}, {"id": 12, "categories_id": "c2"}, "c3"]
        }))
        .unwrap();

        assert_eq!(record.image.unwrap().id().as_str(), "img1");
        let images: Vec<_> = record.images.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(images, vec!["img2", "img3"]);
        let cats: Vec<_> = record.categories.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(cats, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn unset_relations_are_empty() {
        let record: ProductRecord = serde_json::from_value(json!({
            "id": 3,
            "name": "Plain",
            "price": 5,
            "image": null,
            "images": null,
            "date_created": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "3");
        assert!(record.image.is_none());
        assert!(record.images.is_empty());
        assert!(record.categories.is_empty());
        assert!(record.date_created.is_some());
    }

    #[test]
    fn missing_name_is_rejected() {
        let res = serde_json::from_value::<ProductRecord>(json!({"id": "p1", "price": 1}));
        assert!(res.is_err());
    }
}
