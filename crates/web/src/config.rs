//! Environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Duration;
use tracing::{info, warn};

use storefront_auth::OAuthProvider;

const DEV_SESSION_SECRET: &str = "dev-session-secret";
/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Where product/category/user records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBackend {
    Http { url: String, token: Option<String> },
    /// Dev mode: records seeded from a JSON file, empty when none is given.
    InMemory { seed_path: Option<PathBuf> },
}

/// Values the presentation layer needs about the site itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub name: String,
    /// Absolute origin the site is served from, without trailing slash.
    pub public_url: String,
    /// Public API key of the external cart widget; the widget is omitted when unset.
    pub cart_api_key: Option<String>,
}

impl SiteSettings {
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }

    pub fn is_https(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub site: SiteSettings,
    pub content: ContentBackend,
    /// Base for `/assets/{id}` URLs.
    pub assets_url: String,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub providers: Vec<OAuthProvider>,
}

impl Config {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let public_url = var("PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", bind_addr.port()))
            .trim_end_matches('/')
            .to_string();
        if !public_url.starts_with("http://") && !public_url.starts_with("https://") {
            bail!("PUBLIC_URL must be an absolute http(s) URL, got {public_url}");
        }

        let content = match var("CONTENT_API_URL") {
            Some(url) => ContentBackend::Http {
                url: url.trim_end_matches('/').to_string(),
                token: var("CONTENT_API_TOKEN"),
            },
            None => {
                info!("CONTENT_API_URL not set, using in-memory content backend");
                ContentBackend::InMemory {
                    seed_path: var("CONTENT_SEED_PATH").map(PathBuf::from),
                }
            }
        };

        let assets_url = var("CONTENT_ASSETS_URL")
            .or_else(|| match &content {
                ContentBackend::Http { url, .. } => Some(url.clone()),
                ContentBackend::InMemory { .. } => None,
            })
            .unwrap_or_else(|| public_url.clone())
            .trim_end_matches('/')
            .to_string();

        let session_secret = var("SESSION_SECRET").unwrap_or_else(|| {
            warn!("SESSION_SECRET not set; using insecure dev default");
            DEV_SESSION_SECRET.to_string()
        });

        let ttl_hours: i64 = var("SESSION_TTL_HOURS")
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("SESSION_TTL_HOURS must be an integer")?
            .unwrap_or(24 * 30);
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            bail!("SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}");
        }

        let mut providers = Vec::new();
        if let (Some(id), Some(secret)) = (var("GITHUB_CLIENT_ID"), var("GITHUB_CLIENT_SECRET")) {
            providers.push(OAuthProvider::github(id, secret));
        }
        if let (Some(id), Some(secret)) = (var("GOOGLE_CLIENT_ID"), var("GOOGLE_CLIENT_SECRET")) {
            providers.push(OAuthProvider::google(id, secret));
        }
        if providers.is_empty() {
            warn!("no OAuth provider configured; sign-in is disabled");
        }

        Ok(Self {
            bind_addr,
            site: SiteSettings {
                name: var("STORE_NAME").unwrap_or_else(|| "Storefront".to_string()),
                public_url,
                cart_api_key: var("CART_API_KEY"),
            },
            content,
            assets_url,
            session_secret,
            session_ttl: Duration::hours(ttl_hours),
            providers,
        })
    }
}
