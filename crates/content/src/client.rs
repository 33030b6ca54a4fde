use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::{ContentError, ContentResult};

/// Read (and minimal write) access to the content backend.
///
/// Records are returned as raw JSON; typed access goes through
/// [`fetch_by_id`] / [`fetch_where`] with a [`Resource`] type.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Fetch a single record by id, expanding `fields` (dotted paths, `*` wildcards).
    async fn read_item(
        &self,
        collection: &str,
        id: &str,
        fields: &[&str],
    ) -> ContentResult<JsonValue>;

    /// Fetch the records matching `query`.
    async fn read_items(
        &self,
        collection: &str,
        query: &ItemQuery,
    ) -> ContentResult<Vec<JsonValue>>;

    /// Create a record and return it as stored (including the assigned id).
    async fn create_item(&self, collection: &str, item: JsonValue) -> ContentResult<JsonValue>;
}

/// A typed record living in a backend collection.
pub trait Resource: DeserializeOwned + Send {
    const COLLECTION: &'static str;

    /// Fields requested on read. Nested relations must be listed explicitly.
    const FIELDS: &'static [&'static str] = &["*"];
}

/// How many records a collection read may return.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Limit {
    Count(u32),
    /// Every match. Sent as `limit=-1`, which lifts the backend's page size.
    All,
}

/// Filter/sort/limit parameters for a collection read.
///
/// Filters are equality-only. A dotted path (`categories.categories_id`)
/// reaches into relations. Without a limit the backend applies its default
/// page size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub fields: Vec<String>,
    pub filters: Vec<(String, String)>,
    pub sort: Vec<String>,
    pub limit: Option<Limit>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filter_eq(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((path.into(), value.into()));
        self
    }

    /// Sort key; a leading `-` sorts descending.
    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(Limit::Count(limit));
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.limit = Some(Limit::All);
        self
    }
}

fn decode<T: Resource>(value: JsonValue) -> ContentResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ContentError::Malformed(format!("{}: {e}", T::COLLECTION)))
}

/// Fetch one typed record by id.
pub async fn fetch_by_id<T: Resource>(client: &dyn ContentClient, id: &str) -> ContentResult<T> {
    let value = client.read_item(T::COLLECTION, id, T::FIELDS).await?;
    decode(value)
}

/// Fetch typed records matching `query`. Falls back to `T::FIELDS` when the
/// query names no fields.
pub async fn fetch_where<T: Resource>(
    client: &dyn ContentClient,
    query: ItemQuery,
) -> ContentResult<Vec<T>> {
    let query = if query.fields.is_empty() {
        query.fields(T::FIELDS)
    } else {
        query
    };

    client
        .read_items(T::COLLECTION, &query)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}
