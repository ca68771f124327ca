//! Cart read and replace endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use tadka_core::BasketId;

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::models::CartPayload;
use crate::models::cart::CartItem;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Cart write body. The item list is always the complete cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest {
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub is_cart_empty: bool,
}

/// `GET /v1/cart`
///
/// A device without a cart gets the empty payload, not an error.
pub async fn show(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<ApiResponse<CartPayload>> {
    let cart = CartRepository::new(state.pool())
        .find_by_device_id(identity.device_id)
        .await?;

    let payload = cart.map_or_else(CartPayload::empty, CartPayload::from);
    Ok(ApiResponse::ok(payload, "Cart fetched"))
}

/// `POST /v1/cart`
///
/// Replaces the cart's entire item list with the submitted one. An
/// `isCartEmpty` write deletes the record and its basket token outright.
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CartUpdateRequest>,
) -> Result<ApiResponse<CartPayload>> {
    let repo = CartRepository::new(state.pool());

    if request.is_cart_empty {
        repo.delete_by_device_id(identity.device_id).await?;
        return Ok(ApiResponse::ok(CartPayload::empty(), "Cart cleared"));
    }

    let cart = match repo.find_by_device_id(identity.device_id).await? {
        Some(cart) => cart,
        None => create_cart(&repo, identity).await?,
    };

    let updated = repo.replace_items(cart.id, &request.cart).await?;
    Ok(ApiResponse::ok(updated.into(), "Cart updated"))
}

/// `GET /v1/cart/basket/{basket_id}`
///
/// Basket-token lookup for the checkout surface. An unknown token answers
/// with the empty payload, like a device without a cart.
pub async fn show_by_basket(
    State(state): State<AppState>,
    Path(basket_id): Path<String>,
) -> Result<ApiResponse<CartPayload>> {
    let basket_id = BasketId::from_token(basket_id);
    let cart = CartRepository::new(state.pool())
        .find_by_basket_id(&basket_id)
        .await?;

    let (payload, message) = basket_view(cart);
    Ok(ApiResponse::ok(payload, message))
}

/// Success either way; absence is reported through the message only.
fn basket_view(cart: Option<crate::models::Cart>) -> (CartPayload, &'static str) {
    cart.map_or_else(
        || (CartPayload::empty(), "Cart not found for this basketId."),
        |cart| (cart.into(), "Cart fetched"),
    )
}

/// Create the device's cart, absorbing a lost creation race.
async fn create_cart(
    repo: &CartRepository<'_>,
    identity: Identity,
) -> Result<crate::models::Cart> {
    match repo.create(identity.device_id, identity.guest_id).await {
        Ok(cart) => Ok(cart),
        // Another request created it between our lookup and insert.
        Err(RepositoryError::Conflict(_)) => repo
            .find_by_device_id(identity.device_id)
            .await?
            .ok_or_else(|| AppError::Internal("cart vanished after conflict".to_owned())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use tadka_core::{CartId, DeviceId, GuestId};

    use super::*;
    use crate::models::Cart;

    #[test]
    fn test_unknown_basket_is_success_with_empty_payload() {
        let (payload, message) = basket_view(None);
        let envelope = serde_json::to_value(ApiResponse::ok(payload, message)).unwrap();
        assert_eq!(envelope["statusCode"], 200);
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["message"], "Cart not found for this basketId.");
        assert_eq!(envelope["data"]["basketId"], "");
        assert_eq!(envelope["data"]["cartItems"], serde_json::json!([]));
    }

    #[test]
    fn test_known_basket_returns_its_lines() {
        let cart = Cart {
            id: CartId::generate(),
            device_id: DeviceId::generate(),
            guest_id: GuestId::generate(),
            basket_id: BasketId::from_token("aGVsbG8gYmFza2V0IGlkcw"),
            items: vec![CartItem {
                item_id: "ITEM_1".to_owned(),
                item_name: "Palak Paneer".to_owned(),
                quantity: 2,
                price: Decimal::new(2580, 2),
                customization: None,
            }],
        };

        let (payload, message) = basket_view(Some(cart));
        assert_eq!(message, "Cart fetched");
        assert_eq!(payload.basket_id, "aGVsbG8gYmFza2V0IGlkcw");
        assert_eq!(payload.cart_items.len(), 1);
    }
}
