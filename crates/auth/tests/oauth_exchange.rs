use std::collections::HashMap;

use axum::{
    Form, Json, Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use storefront_auth::{AuthError, HttpIdentityProvider, IdentityProvider, OAuthProvider};

struct FakeIdp {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeIdp {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/token", post(token))
            .route("/userinfo", get(userinfo));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    fn provider(&self) -> HttpIdentityProvider {
        HttpIdentityProvider::new(OAuthProvider {
            id: "fake".to_string(),
            display_name: "Fake".to_string(),
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            authorize_url: format!("{}/authorize", self.base_url),
            token_url: format!("{}/token", self.base_url),
            userinfo_url: format!("{}/userinfo", self.base_url),
            scopes: vec!["openid".to_string()],
        })
    }
}

impl Drop for FakeIdp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(Form(form): Form<HashMap<String, String>>) -> axum::response::Response {
    let valid = form.get("grant_type").map(String::as_str) == Some("authorization_code")
        && form.get("client_secret").map(String::as_str) == Some("csecret")
        && form.get("code").map(String::as_str) == Some("good-code");

    if valid {
        Json(json!({ "access_token": "at-123", "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "code expired" })),
        )
            .into_response()
    }
}

async fn userinfo(headers: HeaderMap) -> axum::response::Response {
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    if auth != "Bearer at-123" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "sub": "sub-7", "name": "Grace", "email": "grace@example.com" })).into_response()
}

#[tokio::test]
async fn code_is_exchanged_for_a_profile() {
    let idp = FakeIdp::spawn().await;
    let profile = idp
        .provider()
        .exchange("good-code", "http://localhost/auth/callback/fake")
        .await
        .unwrap();

    assert_eq!(profile.provider, "fake");
    assert_eq!(profile.provider_id, "sub-7");
    assert_eq!(profile.name.as_deref(), Some("Grace"));
}

#[tokio::test]
async fn rejected_code_reports_provider_error() {
    let idp = FakeIdp::spawn().await;
    let err = idp
        .provider()
        .exchange("stale-code", "http://localhost/auth/callback/fake")
        .await
        .unwrap_err();

    match err {
        AuthError::Provider(msg) => assert!(msg.contains("code expired"), "{msg}"),
        other => panic!("expected provider error, got {other:?}"),
    }
}
