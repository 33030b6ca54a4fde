use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use storefront_core::{CategoryId, ProductId};

use crate::app::errors::{self, AppError};
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::views;

pub async fn index(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    let products = services.catalog.list_products().await?;
    Ok(Html(views::layout(
        &services.site,
        &session,
        "",
        &views::listing::index_page(&products),
    )))
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id: ProductId = id.parse().map_err(|_| AppError::NotFound)?;
    let product = services.catalog.product(&id).await?;
    Ok(Html(views::layout(
        &services.site,
        &session,
        &product.name,
        &views::product::product_page(&product, &services.site),
    )))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

pub async fn list_json(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    let result = match query.category {
        Some(raw) => {
            let id: CategoryId = match raw.parse() {
                Ok(v) => v,
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_id",
                        "invalid category id",
                    );
                }
            };
            services.catalog.category_listing(&id).await.map(|l| l.products)
        }
        None => services.catalog.list_products().await,
    };

    match result {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::content_error_to_response(e),
    }
}

pub async fn show_json(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid product id",
            );
        }
    };

    match services.catalog.product(&id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::content_error_to_response(e),
    }
}
