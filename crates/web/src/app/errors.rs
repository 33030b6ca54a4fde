use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use storefront_content::ContentError;

use crate::config::SiteSettings;
use crate::context::SessionContext;
use crate::views;

/// Page handler failure.
///
/// A missing record renders the not-found page; everything else renders the
/// generic failure page. There is no fallback content.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Content(ContentError),
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        if e.is_not_found() {
            AppError::NotFound
        } else {
            AppError::Content(e)
        }
    }
}

fn error_site() -> SiteSettings {
    SiteSettings {
        name: "Storefront".to_string(),
        public_url: String::new(),
        cart_api_key: None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let site = error_site();
        let anonymous = SessionContext::anonymous();
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html(views::layout(
                    &site,
                    &anonymous,
                    "Not found",
                    &views::pages::not_found_page(),
                )),
            )
                .into_response(),
            AppError::Content(e) => {
                error!("page load failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::layout(&site, &anonymous, "Error", &views::pages::failure_page())),
                )
                    .into_response()
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn content_error_to_response(err: ContentError) -> Response {
    match err {
        ContentError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        ContentError::Network(_) | ContentError::Api { .. } => {
            warn!("content backend failure: {err}");
            json_error(StatusCode::BAD_GATEWAY, "content_unavailable", err.to_string())
        }
        ContentError::Malformed(_) => {
            error!("malformed content: {err}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "malformed_content", err.to_string())
        }
    }
}
