//! Checkout and order reads.

use axum::Json;
use axum::extract::{Path, State};

use tadka_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::OrderSummary;
use crate::response::ApiResponse;
use crate::services::orders::{OrderRequest, place_order};
use crate::state::AppState;

/// `POST /v1/order`
///
/// Identity comes from the basket token, not from headers; the checkout
/// page may be the first request a restored tab makes.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<ApiResponse<OrderSummary>> {
    let order = place_order(state.pool(), state.email(), request).await?;

    tracing::info!(order = %order.display_id, kind = order.order_type.as_str(), "Order placed");

    Ok(ApiResponse::created(
        OrderSummary::from(&order),
        "Order placed",
    ))
}

/// `GET /v1/order/{order_id}`
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<ApiResponse<OrderSummary>> {
    let order = OrderRepository::new(state.pool())
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Order not found".to_owned()))?;

    Ok(ApiResponse::ok(OrderSummary::from(&order), "Order fetched"))
}
