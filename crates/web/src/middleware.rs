use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use storefront_auth::SessionKeys;

use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "storefront.session";
pub const STATE_COOKIE: &str = "storefront.oauth_state";

#[derive(Clone)]
pub struct SessionState {
    pub keys: SessionKeys,
}

/// Decode the session cookie into a request-scoped [`SessionContext`].
///
/// Never rejects: a missing, forged or expired cookie just means anonymous.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = match cookie(req.headers(), SESSION_COOKIE) {
        Some(token) => match state.keys.verify(token, Utc::now()) {
            Ok(session) => SessionContext::signed_in(session),
            Err(e) => {
                debug!("ignoring session cookie: {e}");
                SessionContext::anonymous()
            }
        },
        None => SessionContext::anonymous(),
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Value of the first cookie named `name` across all `Cookie` headers.
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for an HTTP-only, lax cookie scoped to the whole site.
pub fn set_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", 0, secure)
}
