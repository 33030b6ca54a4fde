//! Asset URL resolution.
//!
//! Asset references are resolved at read time against the backend's asset
//! endpoint: `{base}/assets/{id}`, optionally with an on-the-fly transform.

use storefront_core::AssetId;

/// How a transformed image fits the requested box.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fit {
    Cover,
    Contain,
    Inside,
    Outside,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
            Fit::Inside => "inside",
            Fit::Outside => "outside",
        }
    }
}

/// Image transform appended as a query string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transform {
    pub width: u32,
    pub height: u32,
    pub fit: Fit,
}

impl Transform {
    pub fn query(&self) -> String {
        format!(
            "width={}&height={}&fit={}",
            self.width,
            self.height,
            self.fit.as_str()
        )
    }
}

/// Fixed-size listing/cart thumbnail.
pub const THUMBNAIL: Transform = Transform {
    width: 200,
    height: 200,
    fit: Fit::Inside,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    base_url: String,
}

impl AssetResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn original(&self, id: &AssetId) -> String {
        format!("{}/assets/{}", self.base_url, id)
    }

    pub fn transformed(&self, id: &AssetId, transform: &Transform) -> String {
        format!("{}?{}", self.original(id), transform.query())
    }

    pub fn thumbnail(&self, id: &AssetId) -> String {
        self.transformed(id, &THUMBNAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builds_original_and_thumbnail_urls() {
        let assets = AssetResolver::new("https://cms.example.com/");
        let id = AssetId::new("img1").unwrap();
        assert_eq!(assets.original(&id), "https://cms.example.com/assets/img1");
        assert_eq!(
            assets.thumbnail(&id),
            "https://cms.example.com/assets/img1?width=200&height=200&fit=inside"
        );
    }

    proptest! {
        #[test]
        fn thumbnail_is_original_plus_fixed_suffix(raw in "[A-Za-z0-9_-]{1,40}") {
            let assets = AssetResolver::new("https://cms.example.com");
            let id = AssetId::new(raw).unwrap();
            prop_assert_eq!(
                assets.thumbnail(&id),
                format!("{}?width=200&height=200&fit=inside", assets.original(&id))
            );
        }
    }
}
