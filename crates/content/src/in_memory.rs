use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::client::{ContentClient, ItemQuery, Limit};
use crate::error::{ContentError, ContentResult};

/// In-memory content backend.
///
/// Intended for tests/dev. Records are stored already expanded, so `fields`
/// selections are ignored and whole records are returned.
#[derive(Debug, Default)]
pub struct InMemoryContentClient {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
    failing: RwLock<HashSet<(String, String)>>,
    next_id: AtomicU64,
}

fn poisoned() -> ContentError {
    ContentError::Network("in-memory store lock poisoned".to_string())
}

fn record_id(record: &JsonValue) -> Option<String> {
    match record.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_eq(value: &JsonValue, expected: &str) -> bool {
    match value {
        JsonValue::String(s) => s == expected,
        JsonValue::Number(n) => n.to_string() == expected,
        JsonValue::Bool(b) => b.to_string() == expected,
        _ => false,
    }
}

/// Equality on a dotted path. Arrays match when any element matches.
fn path_matches(value: &JsonValue, path: &[&str], expected: &str) -> bool {
    if let JsonValue::Array(items) = value {
        return items.iter().any(|v| path_matches(v, path, expected));
    }
    match path.split_first() {
        None => scalar_eq(value, expected),
        Some((head, rest)) => value
            .get(*head)
            .is_some_and(|v| path_matches(v, rest, expected)),
    }
}

fn compare(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
        (JsonValue::Null, _) => Ordering::Less,
        (_, JsonValue::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

impl InMemoryContentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a seed document: `{"collection": [record, ...], ...}`.
    pub fn from_seed(seed: JsonValue) -> ContentResult<Self> {
        let JsonValue::Object(map) = seed else {
            return Err(ContentError::Malformed(
                "seed must be an object of collections".to_string(),
            ));
        };

        let client = Self::new();
        for (collection, records) in map {
            let JsonValue::Array(records) = records else {
                return Err(ContentError::Malformed(format!(
                    "seed collection {collection} must be a list"
                )));
            };
            for record in records {
                client.insert(&collection, record)?;
            }
        }
        Ok(client)
    }

    /// Insert a record, assigning an id if it has none.
    pub fn insert(&self, collection: &str, mut record: JsonValue) -> ContentResult<JsonValue> {
        let JsonValue::Object(fields) = &mut record else {
            return Err(ContentError::Malformed(format!(
                "{collection}: record must be an object"
            )));
        };
        if !fields.contains_key("id") {
            let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
            fields.insert("id".to_string(), JsonValue::String(format!("{collection}-{id}")));
        }

        self.collections
            .write()
            .map_err(|_| poisoned())?
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    /// Make every read of `collection/id` fail with a network error.
    pub fn fail_on(&self, collection: &str, id: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert((collection.to_string(), id.to_string()));
        }
    }

    /// Number of records currently stored in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn check_failure(&self, collection: &str, id: &str) -> ContentResult<()> {
        let failing = self.failing.read().map_err(|_| poisoned())?;
        if failing.contains(&(collection.to_string(), id.to_string())) {
            return Err(ContentError::Network(format!("injected failure for {collection}/{id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentClient for InMemoryContentClient {
    async fn read_item(
        &self,
        collection: &str,
        id: &str,
        _fields: &[&str],
    ) -> ContentResult<JsonValue> {
        self.check_failure(collection, id)?;

        let collections = self.collections.read().map_err(|_| poisoned())?;
        collections
            .get(collection)
            .and_then(|records| {
                records
                    .iter()
                    .find(|r| record_id(r).as_deref() == Some(id))
            })
            .cloned()
            .ok_or_else(|| ContentError::not_found(collection, id))
    }

    async fn read_items(
        &self,
        collection: &str,
        query: &ItemQuery,
    ) -> ContentResult<Vec<JsonValue>> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let mut items: Vec<JsonValue> = collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        query.filters.iter().all(|(path, expected)| {
                            let path: Vec<&str> = path.split('.').collect();
                            path_matches(r, &path, expected)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        for key in query.sort.iter().rev() {
            let (field, descending) = match key.strip_prefix('-') {
                Some(field) => (field, true),
                None => (key.as_str(), false),
            };
            items.sort_by(|a, b| {
                let ord = compare(
                    a.get(field).unwrap_or(&JsonValue::Null),
                    b.get(field).unwrap_or(&JsonValue::Null),
                );
                if descending { ord.reverse() } else { ord }
            });
        }

        if let Some(Limit::Count(n)) = query.limit {
            items.truncate(n as usize);
        }
        Ok(items)
    }

    async fn create_item(&self, collection: &str, item: JsonValue) -> ContentResult<JsonValue> {
        self.insert(collection, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> InMemoryContentClient {
        InMemoryContentClient::from_seed(json!({
            "products": [
                {
                    "id": "p1",
                    "name": "Runner",
                    "date_created": "2024-01-01",
                    "categories": [{"categories_id": "c1"}]
                },
                {
                    "id": "p2",
                    "name": "Tee",
                    "date_created": "2024-03-01",
                    "categories": [{"categories_id": "c2"}]
                },
                {
                    "id": "p3",
                    "name": "Sock",
                    "date_created": "2024-02-01",
                    "categories": [{"categories_id": "c1"}, {"categories_id": "c2"}]
                }
            ],
            "categories": [{"id": 7, "name": "Numeric"}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn read_item_by_string_and_numeric_id() {
        let client = seeded();
        let p = client.read_item("products", "p2", &["*"]).await.unwrap();
        assert_eq!(p["name"], "Tee");

        let c = client.read_item("categories", "7", &[]).await.unwrap();
        assert_eq!(c["name"], "Numeric");

        let err = client.read_item("products", "nope", &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn nested_filters_match_any_array_element() {
        let client = seeded();
        let q = ItemQuery::new().filter_eq("categories.categories_id", "c1");
        let ids: Vec<_> = client
            .read_items("products", &q)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[tokio::test]
    async fn sort_descending_and_limit() {
        let client = seeded();
        let q = ItemQuery::new().sort("-date_created").limit(2);
        let names: Vec<_> = client
            .read_items("products", &q)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Tee", "Sock"]);

        let all = client
            .read_items("products", &ItemQuery::new().unlimited())
            .await
            .unwrap();
        assert_eq!(all.len(), client.count("products"));
    }

    #[tokio::test]
    async fn create_assigns_ids_and_injected_failures_surface() {
        let client = seeded();
        let created = client
            .create_item("users", json!({"provider_id": "42"}))
            .await
            .unwrap();
        assert!(created["id"].as_str().unwrap().starts_with("users-"));
        assert_eq!(client.count("users"), 1);

        client.fail_on("products", "p1");
        let err = client.read_item("products", "p1", &[]).await.unwrap_err();
        assert!(matches!(err, ContentError::Network(_)));
    }
}
