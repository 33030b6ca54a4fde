use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Html,
};

use storefront_core::CategoryId;

use crate::app::errors::AppError;
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::views;

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id: CategoryId = id.parse().map_err(|_| AppError::NotFound)?;
    let listing = services.catalog.category_listing(&id).await?;
    Ok(Html(views::layout(
        &services.site,
        &session,
        &listing.category.name,
        &views::listing::category_page(&listing),
    )))
}
