//! OAuth 2.0 authorization-code flow against an external identity provider.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::AuthError;

/// Static configuration of one OAuth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProvider {
    /// Route key, e.g. `github`.
    pub id: String,
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
}

impl OAuthProvider {
    pub fn github(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            id: "github".to_string(),
            display_name: "GitHub".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            userinfo_url: "https://api.github.com/user".to_string(),
            scopes: vec!["read:user".to_string(), "user:email".to_string()],
        }
    }

    pub fn google(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            id: "google".to_string(),
            display_name: "Google".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string(), "profile".to_string()],
        }
    }
}

/// Identity as reported by the provider after a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider: String,
    /// Provider-issued subject id; the key users are matched on.
    pub provider_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

fn first_string(info: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match info.get(*k)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl ProviderProfile {
    /// Map a userinfo document. Covers OIDC (`sub`, `picture`) and GitHub
    /// (`id`, `login`, `avatar_url`) shapes.
    pub fn from_userinfo(provider: &str, info: &JsonValue) -> Result<Self, AuthError> {
        let provider_id = first_string(info, &["sub", "id"])
            .ok_or_else(|| AuthError::Profile(format!("{provider}: userinfo has no subject id")))?;

        Ok(Self {
            provider: provider.to_string(),
            provider_id,
            name: first_string(info, &["name", "login"]),
            email: first_string(info, &["email"]),
            image: first_string(info, &["picture", "avatar_url"]),
        })
    }
}

/// Seam between the web layer and a concrete provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// URL the browser is redirected to in order to start sign-in.
    fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<String, AuthError>;

    /// Trade an authorization code for the user's profile.
    async fn exchange(&self, code: &str, redirect_uri: &str) -> Result<ProviderProfile, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Standard authorization-code flow over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    config: OAuthProvider,
    http: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(config: OAuthProvider) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &OAuthProvider {
        &self.config
    }

    async fn access_token(&self, code: &str, redirect_uri: &str) -> Result<String, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let resp = self
            .http
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body: TokenResponse = resp.json().await?;
        match body {
            TokenResponse {
                access_token: Some(token),
                ..
            } if status.is_success() => Ok(token),
            TokenResponse {
                error,
                error_description,
                ..
            } => Err(AuthError::Provider(format!(
                "token exchange failed ({status}): {}",
                error_description
                    .or(error)
                    .unwrap_or_else(|| "no access token".to_string())
            ))),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn authorize_url(&self, state: &str, redirect_uri: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| AuthError::Provider(format!("invalid authorize url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);
        Ok(url.into())
    }

    async fn exchange(&self, code: &str, redirect_uri: &str) -> Result<ProviderProfile, AuthError> {
        let token = self.access_token(code, redirect_uri).await?;
        debug!(provider = %self.config.id, "authorization code exchanged");

        let resp = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            // GitHub rejects requests without a user agent.
            .header(reqwest::header::USER_AGENT, "storefront")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::Provider(format!(
                "userinfo returned status {}",
                resp.status()
            )));
        }

        let info: JsonValue = resp.json().await?;
        ProviderProfile::from_userinfo(&self.config.id, &info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_github_and_oidc_profiles() {
        let gh = ProviderProfile::from_userinfo(
            "github",
            &json!({
                "id": 583231,
                "login": "octocat",
                "avatar_url": "https://a/x.png",
                "email": null
            }),
        )
        .unwrap();
        assert_eq!(gh.provider_id, "583231");
        assert_eq!(gh.name.as_deref(), Some("octocat"));
        assert_eq!(gh.image.as_deref(), Some("https://a/x.png"));
        assert!(gh.email.is_none());

        let google = ProviderProfile::from_userinfo(
            "google",
            &json!({
                "sub": "1099",
                "name": "Ada",
                "email": "ada@example.com",
                "picture": "https://p"
            }),
        )
        .unwrap();
        assert_eq!(google.provider_id, "1099");
        assert_eq!(google.email.as_deref(), Some("ada@example.com"));

        assert!(ProviderProfile::from_userinfo("x", &json!({"name": "anon"})).is_err());
    }

    #[test]
    fn authorize_url_carries_code_flow_params() {
        let p = HttpIdentityProvider::new(OAuthProvider::github("cid", "secret"));
        let url = p
            .authorize_url("st4te", "http://localhost:8080/auth/callback/github")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("client_id".into(), "cid".into())));
        assert!(pairs.contains(&("state".into(), "st4te".into())));
        assert!(pairs.contains(&("scope".into(), "read:user user:email".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://localhost:8080/auth/callback/github".into()
        )));
        assert!(!url.contains("secret"));
    }
}
