//! Customer contact details and delivery eligibility reads.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use tadka_core::OrderType;

use crate::db::CustomerRepository;
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::models::{Address, CustomerDetails, DeliveryDetails};
use crate::response::ApiResponse;
use crate::services::geocode::is_plausible;
use crate::services::validation::{validate_address, validate_contact};
use crate::state::AppState;

/// Contact block of the save request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub name: String,
    pub phone_number: String,
    #[serde(default)]
    pub address: Option<Address>,
}

/// `POST /v1/user-details/create` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRequest {
    pub order_type: OrderType,
    pub customer: CustomerPayload,
}

/// `GET /v1/user-details/details` wire shape. `customer_details` is null
/// until the customer has saved anything.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsView {
    pub customer_details: Option<CustomerDetails>,
    pub has_address: bool,
}

/// `POST /v1/user-details/create`
///
/// Validates and saves the contact details. For delivery orders the address
/// is required, checked against the forward-lookup candidates, and the
/// eligibility computation is kicked off in the background so the webhook's
/// answer is usually ready before the client asks for it.
pub async fn save(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<DetailsRequest>,
) -> Result<ApiResponse<CustomerDetails>> {
    let customer = &request.customer;
    let (phone_number, mut errors) = validate_contact(&customer.name, &customer.phone_number);

    let address = match (request.order_type, &customer.address) {
        (OrderType::Delivery, None) => {
            errors.push(crate::response::FieldError::new(
                "displayAddress",
                "Please enter a delivery address",
            ));
            None
        }
        (OrderType::Delivery, Some(address)) => {
            errors.extend(validate_address(address));
            Some(address)
        }
        // A pickup submission never touches the stored address.
        (OrderType::Pickup, _) => None,
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if let Some(address) = address {
        let hits = state.geocoder().lookup(&address.display_address).await;
        if !is_plausible(&hits, &address.pincode, &address.town) {
            return Err(AppError::invalid_field(
                "displayAddress",
                "We could not verify this address",
            ));
        }
    }

    let profile = CustomerRepository::new(state.pool())
        .upsert_contact(
            identity.device_id,
            identity.guest_id,
            customer.name.trim(),
            &phone_number,
            request.order_type,
            address,
        )
        .await?;

    if let Some(address) = address {
        state.delivery().spawn(
            state.pool().clone(),
            identity.device_id,
            identity.guest_id,
            address.display_address.clone(),
        );
    }

    Ok(ApiResponse::ok(
        CustomerDetails::from(&profile),
        "Details saved",
    ))
}

/// `GET /v1/user-details/details`
///
/// A missing profile is an ordinary answer here, not an error: the client
/// asks on page load to decide whether to show the saved-details form.
pub async fn details(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<ApiResponse<DetailsView>> {
    let profile = CustomerRepository::new(state.pool())
        .find_by_identity(identity.device_id, identity.guest_id)
        .await?;

    let view = DetailsView {
        has_address: profile
            .as_ref()
            .is_some_and(|profile| profile.address.is_some()),
        customer_details: profile.as_ref().map(CustomerDetails::from),
    };

    Ok(ApiResponse::ok(view, "Details fetched"))
}

/// `GET /v1/user-details/delivery`
pub async fn delivery(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<ApiResponse<Option<DeliveryDetails>>> {
    let details = CustomerRepository::new(state.pool())
        .find_by_identity(identity.device_id, identity.guest_id)
        .await?
        .as_ref()
        .map(DeliveryDetails::from);

    Ok(ApiResponse::ok(details, "Delivery details fetched"))
}
