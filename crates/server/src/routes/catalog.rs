//! Cached catalog listings.

use std::sync::Arc;

use axum::extract::State;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::{Category, MenuItem};
use crate::response::ApiResponse;
use crate::state::AppState;

/// `GET /v1/menu/listing`
pub async fn menu_listing(State(state): State<AppState>) -> Result<ApiResponse<Vec<MenuItem>>> {
    let pool = state.pool().clone();
    let items = state
        .menu_cache()
        .try_get_with((), async move {
            CatalogRepository::new(&pool).list_menu().await.map(Arc::new)
        })
        .await
        .map_err(|e| AppError::Internal(format!("menu listing failed: {e}")))?;

    Ok(ApiResponse::ok(items.as_ref().clone(), "Menu fetched"))
}

/// `GET /v1/category/listing`
pub async fn category_listing(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Category>>> {
    let pool = state.pool().clone();
    let categories = state
        .category_cache()
        .try_get_with((), async move {
            CatalogRepository::new(&pool)
                .list_categories()
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e| AppError::Internal(format!("category listing failed: {e}")))?;

    Ok(ApiResponse::ok(
        categories.as_ref().clone(),
        "Categories fetched",
    ))
}
