//! HTTP client for a Directus-style REST content API.
//!
//! Items live under `{base}/items/{collection}` and every response wraps its
//! payload in `{"data": ...}`.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::client::{ContentClient, ItemQuery, Limit};
use crate::error::{ContentError, ContentResult};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: JsonValue,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Content backend client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Static access token sent as a bearer token on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self, collection: &str, id: Option<&str>) -> ContentResult<Url> {
        let base = &self.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| ContentError::Network(format!("invalid base url {base}: {e}")))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ContentError::Network(format!("base url cannot be a base: {base}")))?;
            segments.pop_if_empty().extend(["items", collection]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and unwrap the `data` envelope.
    async fn execute(&self, req: RequestBuilder) -> ContentResult<JsonValue> {
        let resp = self.authorize(req).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope = resp.json().await?;
        Ok(envelope.data)
    }
}

/// `a.b.c` → `filter[a][b][c][_eq]`.
pub(crate) fn filter_param(path: &str) -> String {
    let mut key = String::from("filter");
    for part in path.split('.') {
        key.push('[');
        key.push_str(part);
        key.push(']');
    }
    key.push_str("[_eq]");
    key
}

pub(crate) fn query_pairs(query: &ItemQuery) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if !query.fields.is_empty() {
        pairs.push(("fields".to_string(), query.fields.join(",")));
    }
    for (path, value) in &query.filters {
        pairs.push((filter_param(path), value.clone()));
    }
    if !query.sort.is_empty() {
        pairs.push(("sort".to_string(), query.sort.join(",")));
    }
    match query.limit {
        Some(Limit::Count(n)) => pairs.push(("limit".to_string(), n.to_string())),
        Some(Limit::All) => pairs.push(("limit".to_string(), "-1".to_string())),
        None => {}
    }
    pairs
}

#[async_trait]
impl ContentClient for HttpContentClient {
    async fn read_item(
        &self,
        collection: &str,
        id: &str,
        fields: &[&str],
    ) -> ContentResult<JsonValue> {
        let url = self.items_url(collection, Some(id))?;
        debug!(%url, "content read_item");

        let mut req = self.http.get(url);
        if !fields.is_empty() {
            req = req.query(&[("fields", fields.join(","))]);
        }

        match self.execute(req).await {
            Ok(JsonValue::Null) => Err(ContentError::not_found(collection, id)),
            Ok(data) => Ok(data),
            Err(ContentError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ContentError::not_found(collection, id))
            }
            Err(e) => Err(e),
        }
    }

    async fn read_items(
        &self,
        collection: &str,
        query: &ItemQuery,
    ) -> ContentResult<Vec<JsonValue>> {
        let url = self.items_url(collection, None)?;
        debug!(%url, filters = query.filters.len(), "content read_items");

        let req = self.http.get(url).query(&query_pairs(query));
        match self.execute(req).await? {
            JsonValue::Array(items) => Ok(items),
            JsonValue::Null => Ok(Vec::new()),
            other => Err(ContentError::Malformed(format!(
                "{collection}: expected a list, got {}",
                kind(&other)
            ))),
        }
    }

    async fn create_item(&self, collection: &str, item: JsonValue) -> ContentResult<JsonValue> {
        let url = self.items_url(collection, None)?;
        debug!(%url, "content create_item");

        match self.execute(self.http.post(url).json(&item)).await? {
            JsonValue::Null => Err(ContentError::Malformed(format!(
                "{collection}: create returned no record"
            ))),
            data => Ok(data),
        }
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_params_use_bracket_paths() {
        assert_eq!(filter_param("provider_id"), "filter[provider_id][_eq]");
        assert_eq!(
            filter_param("categories.categories_id"),
            "filter[categories][categories_id][_eq]"
        );
    }

    #[test]
    fn query_pairs_are_ordered_and_joined() {
        let q = ItemQuery::new()
            .fields(&["id", "name"])
            .filter_eq("status", "published")
            .sort("-date_created")
            .limit(10);

        assert_eq!(
            query_pairs(&q),
            vec![
                ("fields".to_string(), "id,name".to_string()),
                ("filter[status][_eq]".to_string(), "published".to_string()),
                ("sort".to_string(), "-date_created".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn unlimited_lifts_the_page_size() {
        let q = ItemQuery::new().sort("-date_created").unlimited();
        assert_eq!(
            query_pairs(&q),
            vec![
                ("sort".to_string(), "-date_created".to_string()),
                ("limit".to_string(), "-1".to_string()),
            ]
        );
        assert!(query_pairs(&ItemQuery::new()).is_empty());
    }

    #[test]
    fn items_url_tolerates_trailing_slash_and_prefix() {
        let client = HttpContentClient::new("https://cms.example.com/api/");
        let url = client.items_url("products", Some("p1")).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/api/items/products/p1");
        assert_eq!(client.base_url(), "https://cms.example.com/api");
    }
}
