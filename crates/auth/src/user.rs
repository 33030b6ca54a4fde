//! Backend user records and the sign-in upsert.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use storefront_content::{ContentClient, ContentError, ItemQuery, Resource, fetch_where};
use storefront_core::UserId;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProviderProfile};
use crate::session::{Session, SessionKeys, SessionUser};

/// A user as stored in the content backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub provider: Option<String>,
    pub provider_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Resource for UserRecord {
    const COLLECTION: &'static str = "users";
    const FIELDS: &'static [&'static str] =
        &["id", "provider", "provider_id", "name", "email", "avatar"];
}

/// Find the user with the profile's provider id, creating it if absent.
///
/// Exactly one record is created for an unknown user; none for a known one.
pub async fn upsert_user(
    client: &dyn ContentClient,
    profile: &ProviderProfile,
) -> Result<UserRecord, AuthError> {
    let query = ItemQuery::new()
        .filter_eq("provider_id", profile.provider_id.as_str())
        .limit(1);

    if let Some(existing) = fetch_where::<UserRecord>(client, query).await?.into_iter().next() {
        return Ok(existing);
    }

    let created = client
        .create_item(
            UserRecord::COLLECTION,
            json!({
                "provider": profile.provider,
                "provider_id": profile.provider_id,
                "name": profile.name,
                "email": profile.email,
                "avatar": profile.image,
            }),
        )
        .await?;

    let record: UserRecord = serde_json::from_value(created)
        .map_err(|e| ContentError::Malformed(format!("{}: {e}", UserRecord::COLLECTION)))?;
    info!(user_id = %record.id, provider = %profile.provider, "created user on first sign-in");
    Ok(record)
}

/// Complete the OAuth callback: exchange the code, upsert the user and sign
/// a session carrying the backend user id.
pub async fn sign_in(
    provider: &dyn IdentityProvider,
    users: &dyn ContentClient,
    keys: &SessionKeys,
    code: &str,
    redirect_uri: &str,
    now: DateTime<Utc>,
) -> Result<(String, Session), AuthError> {
    let profile = provider.exchange(code, redirect_uri).await?;
    let record = upsert_user(users, &profile).await?;

    let user = SessionUser {
        id: record.id,
        provider: profile.provider,
        provider_id: profile.provider_id,
        name: profile.name.or(record.name),
        email: profile.email.or(record.email),
        image: profile.image.or(record.avatar),
    };
    keys.issue(&user, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use storefront_content::InMemoryContentClient;

    fn profile(id: &str) -> ProviderProfile {
        ProviderProfile {
            provider: "github".to_string(),
            provider_id: id.to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            image: None,
        }
    }

    #[tokio::test]
    async fn first_sign_in_creates_exactly_one_user() {
        let store = InMemoryContentClient::new();

        let user = upsert_user(&store, &profile("42")).await.unwrap();
        assert_eq!(store.count("users"), 1);
        assert_eq!(user.provider_id, "42");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn returning_user_creates_nothing() {
        let store = InMemoryContentClient::new();
        let first = upsert_user(&store, &profile("42")).await.unwrap();
        let second = upsert_user(&store, &profile("42")).await.unwrap();

        assert_eq!(store.count("users"), 1);
        assert_eq!(first.id, second.id);

        upsert_user(&store, &profile("43")).await.unwrap();
        assert_eq!(store.count("users"), 2);
    }

    struct FixedProvider;

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        fn id(&self) -> &str {
            "github"
        }

        fn display_name(&self) -> &str {
            "GitHub"
        }

        fn authorize_url(&self, state: &str, _redirect_uri: &str) -> Result<String, AuthError> {
            Ok(format!("https://idp.test/authorize?state={state}"))
        }

        async fn exchange(
            &self,
            code: &str,
            _redirect_uri: &str,
        ) -> Result<ProviderProfile, AuthError> {
            if code == "good" {
                Ok(profile("42"))
            } else {
                Err(AuthError::Provider("bad_verification_code".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn sign_in_session_carries_backend_id() {
        let store = InMemoryContentClient::new();
        let keys = SessionKeys::new(b"secret", Duration::hours(1));
        let now = Utc::now();

        let (token, session) = sign_in(&FixedProvider, &store, &keys, "good", "http://x/cb", now)
            .await
            .unwrap();

        let verified = keys.verify(&token, now).unwrap();
        assert_eq!(verified.user.id, session.user.id);
        assert!(verified.user.id.as_str().starts_with("users-"));
        assert_eq!(verified.user.provider_id, "42");
    }

    #[tokio::test]
    async fn failed_exchange_creates_no_user() {
        let store = InMemoryContentClient::new();
        let keys = SessionKeys::new(b"secret", Duration::hours(1));

        let err = sign_in(&FixedProvider, &store, &keys, "bad", "http://x/cb", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Provider(_)));
        assert_eq!(store.count("users"), 0);
    }
}
