//! Delivery eligibility computation.
//!
//! Geocodes the customer's display address, measures the great-circle
//! distance from the restaurant origin and prices the trip. The result is
//! both returned to the caller and persisted on the customer profile as a
//! wholesale overwrite.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use tadka_core::{Coordinates, DeliveryQuote, DeviceId, GuestId, delivery_quote, distance_km};

use crate::config::RestaurantConfig;
use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::services::geocode::{GeocodeError, Geocoder};

/// Full result of a delivery-charge computation, as returned by the webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryComputation {
    /// Great-circle distance, rounded to two decimals.
    pub distance_km: f64,
    pub free_delivery_radius_km: f64,
    pub max_delivery_radius_km: f64,
    pub user_coords: Coordinates,
    #[serde(flatten)]
    pub quote: DeliveryQuote,
}

impl DeliveryComputation {
    /// The fee to persist: `0` when the address is out of range.
    #[must_use]
    pub fn stored_fee(&self) -> Decimal {
        self.quote.fee.unwrap_or(Decimal::ZERO)
    }
}

/// Computes and persists delivery eligibility for a customer address.
#[derive(Clone)]
pub struct DeliveryService {
    geocoder: Geocoder,
    restaurant: RestaurantConfig,
}

impl DeliveryService {
    /// Create a delivery service bound to the restaurant's origin and radii.
    #[must_use]
    pub const fn new(geocoder: Geocoder, restaurant: RestaurantConfig) -> Self {
        Self {
            geocoder,
            restaurant,
        }
    }

    /// Geocode an address and price the trip from the restaurant origin.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` when the address cannot be resolved.
    pub async fn compute(&self, display_address: &str) -> Result<DeliveryComputation, GeocodeError> {
        let user_coords = self.geocoder.geocode(display_address).await?;
        Ok(compute_for_coords(&self.restaurant, user_coords))
    }

    /// Compute eligibility and overwrite the profile's delivery fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Geocode` when the address cannot be resolved and
    /// `AppError::Database` when the profile write fails.
    pub async fn compute_and_store(
        &self,
        pool: &PgPool,
        device_id: DeviceId,
        guest_id: GuestId,
        display_address: &str,
    ) -> Result<DeliveryComputation, AppError> {
        let computation = self.compute(display_address).await?;

        CustomerRepository::new(pool)
            .update_delivery(
                device_id,
                guest_id,
                computation.user_coords,
                computation.quote.deliverable,
                computation.quote.is_free_delivery(),
                computation.stored_fee(),
            )
            .await?;

        Ok(computation)
    }

    /// Fire-and-forget variant used after an address save. The HTTP response
    /// does not wait for it; failures are logged and the webhook can redo
    /// the work later.
    pub fn spawn(&self, pool: PgPool, device_id: DeviceId, guest_id: GuestId, display_address: String) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service
                .compute_and_store(&pool, device_id, guest_id, &display_address)
                .await
            {
                tracing::warn!(
                    error = %e,
                    %device_id,
                    "Background delivery computation failed"
                );
            }
        });
    }
}

/// Pure half of the computation, once coordinates are known.
fn compute_for_coords(restaurant: &RestaurantConfig, user_coords: Coordinates) -> DeliveryComputation {
    let distance = distance_km(restaurant.origin, user_coords);
    let quote = delivery_quote(distance, restaurant.free_radius_km, restaurant.max_radius_km);

    DeliveryComputation {
        distance_km: (distance * 100.0).round() / 100.0,
        free_delivery_radius_km: restaurant.free_radius_km,
        max_delivery_radius_km: restaurant.max_radius_km,
        user_coords,
        quote,
    }
}
