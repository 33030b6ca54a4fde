//! Service wiring: content backend, normalizer, identity providers, session keys.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use storefront_auth::{HttpIdentityProvider, IdentityProvider, SessionKeys};
use storefront_catalog::{AssetResolver, Normalizer};
use storefront_content::{ContentClient, HttpContentClient, InMemoryContentClient};

use crate::config::{Config, ContentBackend, SiteSettings};

/// Everything request handlers need. Immutable after startup.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Normalizer,
    /// Same backend the catalog reads from; used for user records.
    pub content: Arc<dyn ContentClient>,
    pub providers: Vec<Arc<dyn IdentityProvider>>,
    pub sessions: SessionKeys,
    pub site: SiteSettings,
}

impl AppServices {
    pub fn new(
        content: Arc<dyn ContentClient>,
        assets: AssetResolver,
        providers: Vec<Arc<dyn IdentityProvider>>,
        sessions: SessionKeys,
        site: SiteSettings,
    ) -> Self {
        Self {
            catalog: Normalizer::new(content.clone(), assets),
            content,
            providers,
            sessions,
            site,
        }
    }

    pub fn provider(&self, id: &str) -> Option<&dyn IdentityProvider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }

    /// OAuth redirect URI registered with the provider.
    pub fn redirect_uri(&self, provider_id: &str) -> String {
        self.site.absolute(&format!("/auth/callback/{provider_id}"))
    }
}

async fn build_content(backend: &ContentBackend) -> anyhow::Result<Arc<dyn ContentClient>> {
    match backend {
        ContentBackend::Http { url, token } => {
            info!(%url, "using HTTP content backend");
            let client = HttpContentClient::new(url.clone());
            let client = match token {
                Some(token) => client.with_token(token.clone()),
                None => client,
            };
            Ok(Arc::new(client))
        }
        ContentBackend::InMemory { seed_path: None } => Ok(Arc::new(InMemoryContentClient::new())),
        ContentBackend::InMemory {
            seed_path: Some(path),
        } => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading content seed {}", path.display()))?;
            let seed: serde_json::Value =
                serde_json::from_str(&raw).context("content seed is not valid JSON")?;
            let client = InMemoryContentClient::from_seed(seed)?;
            info!(path = %path.display(), "seeded in-memory content backend");
            Ok(Arc::new(client))
        }
    }
}

pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    let content = build_content(&config.content).await?;

    let providers = config
        .providers
        .iter()
        .cloned()
        .map(|p| Arc::new(HttpIdentityProvider::new(p)) as Arc<dyn IdentityProvider>)
        .collect();

    Ok(AppServices::new(
        content,
        AssetResolver::new(config.assets_url.clone()),
        providers,
        SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl),
        config.site.clone(),
    ))
}
