//! Delivery-charge webhook.
//!
//! The storefront calls this after an address is saved. The computation is
//! authoritative: its result is persisted on the customer profile and the
//! same fields are re-checked at checkout.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::response::ApiResponse;
use crate::services::delivery::DeliveryComputation;
use crate::state::AppState;

/// `POST /webhook/delivery-charge` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryChargeRequest {
    pub address: String,
}

/// `POST /webhook/delivery-charge`
pub async fn delivery_charge(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<DeliveryChargeRequest>,
) -> Result<ApiResponse<DeliveryComputation>> {
    if request.address.trim().is_empty() {
        return Err(AppError::invalid_field("address", "Please enter the address"));
    }

    let computation = state
        .delivery()
        .compute_and_store(
            state.pool(),
            identity.device_id,
            identity.guest_id,
            request.address.trim(),
        )
        .await
        .map_err(|e| match e {
            // No profile yet: the client skipped the details step.
            AppError::Database(RepositoryError::NotFound) => {
                AppError::BadRequest("Customer details not found".to_owned())
            }
            other => other,
        })?;

    Ok(ApiResponse::ok(computation, "Delivery charge computed"))
}
