//! OAuth sign-in/out and the session endpoint.
//!
//! Callback failures never surface as 500s; they redirect to `/auth/error`
//! with a short error code.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderMap, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use storefront_auth::sign_in;

use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::{SESSION_COOKIE, STATE_COOKIE, clear_cookie, cookie, set_cookie};
use crate::views;

/// How long a started sign-in may take before its state cookie lapses.
const STATE_TTL_SECS: i64 = 600;

pub fn router() -> Router {
    Router::new()
        .route("/signin", get(signin_page))
        .route("/signin/:provider", get(start_signin))
        .route("/callback/:provider", get(callback))
        .route("/signout", get(signout).post(signout))
        .route("/error", get(error_page))
}

fn error_redirect(code: &str) -> Response {
    Redirect::to(&format!("/auth/error?error={code}")).into_response()
}

pub async fn signin_page(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Html<String> {
    let providers: Vec<(&str, &str)> = services
        .providers
        .iter()
        .map(|p| (p.id(), p.display_name()))
        .collect();
    Html(views::layout(
        &services.site,
        &session,
        "Sign in",
        &views::pages::signin_page(&providers),
    ))
}

/// Redirect to the provider, binding a fresh `state` to this browser.
pub async fn start_signin(
    Extension(services): Extension<Arc<AppServices>>,
    Path(provider_id): Path<String>,
) -> Response {
    let Some(provider) = services.provider(&provider_id) else {
        return error_redirect("Configuration");
    };

    let state = Uuid::new_v4().simple().to_string();
    let url = match provider.authorize_url(&state, &services.redirect_uri(provider.id())) {
        Ok(url) => url,
        Err(e) => {
            warn!(provider = %provider_id, "cannot build authorize url: {e}");
            return error_redirect("Configuration");
        }
    };

    let state_cookie = set_cookie(
        STATE_COOKIE,
        &format!("{}.{state}", provider.id()),
        STATE_TTL_SECS,
        services.site.is_https(),
    );
    (
        AppendHeaders([(header::SET_COOKIE, state_cookie)]),
        Redirect::to(&url),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Extension(services): Extension<Arc<AppServices>>,
    Path(provider_id): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(provider) = services.provider(&provider_id) else {
        return error_redirect("Configuration");
    };
    if let Some(error) = &query.error {
        info!(provider = %provider_id, %error, "provider denied sign-in");
        return error_redirect("AccessDenied");
    }

    let expected = cookie(&headers, STATE_COOKIE);
    let presented = query
        .state
        .as_deref()
        .map(|s| format!("{}.{s}", provider.id()));
    let (Some(code), Some(expected), Some(presented)) =
        (query.code.as_deref(), expected, presented)
    else {
        return error_redirect("State");
    };
    if expected != presented {
        warn!(provider = %provider_id, "oauth state mismatch");
        return error_redirect("State");
    }

    let redirect_uri = services.redirect_uri(provider.id());
    let (token, session) = match sign_in(
        provider,
        services.content.as_ref(),
        &services.sessions,
        code,
        &redirect_uri,
        Utc::now(),
    )
    .await
    {
        Ok(v) => v,
        Err(e) => {
            warn!(provider = %provider_id, "sign-in callback failed: {e}");
            return error_redirect("Callback");
        }
    };
    info!(user_id = %session.user.id, provider = %provider_id, "signed in");

    let secure = services.site.is_https();
    (
        AppendHeaders([
            (
                header::SET_COOKIE,
                set_cookie(SESSION_COOKIE, &token, services.sessions.ttl().num_seconds(), secure),
            ),
            (header::SET_COOKIE, clear_cookie(STATE_COOKIE, secure)),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}

pub async fn signout(Extension(services): Extension<Arc<AppServices>>) -> Response {
    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_cookie(SESSION_COOKIE, services.site.is_https()),
        )]),
        Redirect::to("/"),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

pub async fn error_page(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ErrorQuery>,
) -> Html<String> {
    Html(views::layout(
        &services.site,
        &session,
        "Sign-in error",
        &views::pages::auth_error_page(query.error.as_deref().unwrap_or_default()),
    ))
}

/// Current session, or `{}` when anonymous.
pub async fn session_json(Extension(session): Extension<SessionContext>) -> Response {
    match session.session() {
        Some(s) => Json(s).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}
