//! Customer profile and delivery eligibility.
//!
//! One profile per (device, guest) identity pair. The delivery fields are
//! overwritten wholesale by the delivery-charge webhook on every new address
//! submission - there is no merge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tadka_core::{Coordinates, DeviceId, GuestId, OrderType, ProfileId};

/// Structured delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub pincode: String,
    pub building_number: String,
    pub street: String,
    pub town: String,
    /// Free-text form used for geocoding and printed on the order.
    pub display_address: String,
}

/// Stored customer profile keyed by (device, guest).
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub id: ProfileId,
    /// Human-readable label, e.g. `U00000001`.
    pub display_id: String,
    pub device_id: DeviceId,
    pub guest_id: GuestId,
    pub name: String,
    pub phone_number: String,
    pub order_type: OrderType,
    pub address: Option<Address>,
    /// Last geocoded customer position.
    pub user_location: Option<Coordinates>,
    pub deliverable: Option<bool>,
    pub is_free_delivery: Option<bool>,
    pub delivery_fee: Option<Decimal>,
}

/// Wire shape for `GET /v1/user-details/details`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl From<&CustomerProfile> for CustomerDetails {
    fn from(profile: &CustomerProfile) -> Self {
        Self {
            name: profile.name.clone(),
            phone_number: profile.phone_number.clone(),
            address: profile.address.clone(),
        }
    }
}

/// Wire shape for `GET /v1/user-details/delivery`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub order_type: OrderType,
    pub deliverable: bool,
    pub is_free_delivery: bool,
    pub delivery_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<Coordinates>,
}

impl From<&CustomerProfile> for DeliveryDetails {
    fn from(profile: &CustomerProfile) -> Self {
        Self {
            order_type: profile.order_type,
            deliverable: profile.deliverable.unwrap_or(false),
            is_free_delivery: profile.is_free_delivery.unwrap_or(false),
            delivery_fee: profile.delivery_fee.unwrap_or(Decimal::ZERO),
            user_location: profile.user_location,
        }
    }
}
