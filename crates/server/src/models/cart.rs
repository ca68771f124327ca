//! Cart model with replace-whole-list semantics.
//!
//! The stored item list is always the last full list a client submitted;
//! the server never diffs against prior state. `price` on a line is the
//! line total (unit price x quantity) - clients recompute it on every
//! quantity change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tadka_core::{BasketId, CartId, DeviceId, GuestId, SpicyLevel};

/// Per-line customization options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spicy_level: Option<SpicyLevel>,
}

/// One line of a cart. `price` is the line total, not the unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

/// A persisted cart, one per device.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub device_id: DeviceId,
    pub guest_id: GuestId,
    pub basket_id: BasketId,
    pub items: Vec<CartItem>,
}

/// Wire shape for cart reads and writes.
///
/// "No cart yet" is modeled as this shape with empty items and an empty
/// basket token, never as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart_items: Vec<CartItem>,
    pub basket_id: String,
}

impl CartPayload {
    /// The empty default returned when no cart exists for a device.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cart_items: Vec::new(),
            basket_id: String::new(),
        }
    }
}

impl From<Cart> for CartPayload {
    fn from(cart: Cart) -> Self {
        Self {
            cart_items: cart.items,
            basket_id: cart.basket_id.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, quantity: u32, price: Decimal) -> CartItem {
        CartItem {
            item_id: id.to_owned(),
            item_name: format!("Item {id}"),
            quantity,
            price,
            customization: None,
        }
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let item = line("ITEM_123", 2, Decimal::new(1998, 2));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["itemId"], "ITEM_123");
        assert_eq!(json["itemName"], "Item ITEM_123");
        assert!(json.get("customization").is_none());
    }

    #[test]
    fn test_customization_round_trip() {
        let item = CartItem {
            customization: Some(Customization {
                notes: Some("extra crispy".to_owned()),
                options: vec!["Extra cheese".to_owned()],
                spicy_level: Some(SpicyLevel::Spicy),
            }),
            ..line("ITEM_456", 1, Decimal::new(250, 2))
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_empty_payload_shape() {
        let json = serde_json::to_value(CartPayload::empty()).unwrap();
        assert_eq!(json["cartItems"], serde_json::json!([]));
        assert_eq!(json["basketId"], "");
    }
}
