//! Restaurant info endpoint.

use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use tadka_core::Coordinates;

use crate::error::Result;
use crate::response::ApiResponse;
use crate::services::hours::{OpeningHours, RESTAURANT_TZ, opening_hours};
use crate::state::AppState;

/// Wire shape for `GET /v1/info`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    pub location: Coordinates,
    pub free_delivery_radius_km: f64,
    pub max_delivery_radius_km: f64,
    #[serde(flatten)]
    pub hours: OpeningHours,
}

/// `GET /v1/info`
pub async fn show(State(state): State<AppState>) -> Result<ApiResponse<RestaurantInfo>> {
    let restaurant = &state.config().restaurant;
    let now = Utc::now().with_timezone(&RESTAURANT_TZ);

    let info = RestaurantInfo {
        restaurant_id: restaurant.id.clone(),
        location: restaurant.origin,
        free_delivery_radius_km: restaurant.free_radius_km,
        max_delivery_radius_km: restaurant.max_radius_km,
        hours: opening_hours(now),
    };

    Ok(ApiResponse::ok(info, "Info fetched"))
}
