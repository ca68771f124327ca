//! Order assembly.
//!
//! Checkout snapshots the cart, the saved customer details and the computed
//! fee breakdown into an immutable order record, then fires the notification
//! email in the background. The cart itself stays; the client clears it with
//! an `isCartEmpty` write once the confirmation page renders.
//!
//! Identity is resolved through the basket token: the cart names its device,
//! the device names its session and profile. A basket whose session or
//! profile has vanished is broken referential integrity, not client error.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use tadka_core::{BasketId, OrderType, PaymentMethod, service_fee};

use crate::db::orders::NewOrder;
use crate::db::{CartRepository, CustomerRepository, OrderRepository, SessionRepository};
use crate::error::AppError;
use crate::models::cart::CartItem;
use crate::models::{CustomerProfile, DeliveryTime, Discount, Order, OrderAmount};
use crate::services::EmailService;
use crate::services::hours::RESTAURANT_TZ;

/// Checkout request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub basket_id: String,
    pub order_type: OrderType,
    pub selected_method: PaymentMethod,
    pub delivery_time: DeliveryTime,
    #[serde(default)]
    pub delivery_note: String,
    #[serde(default)]
    pub tip_amount: Decimal,
    #[serde(default)]
    pub discount: Option<Discount>,
}

/// Place an order for the basket named in the request.
///
/// Resolves cart, session and customer profile from the basket token,
/// re-checks delivery eligibility for delivery orders, persists the
/// snapshot and spawns the notification email.
///
/// # Errors
///
/// Returns 400-class errors for an empty cart, a scheduled slot without a
/// time, or an undeliverable address; a basket without cart, session or
/// profile is `AppError::Integrity`.
pub async fn place_order(
    pool: &PgPool,
    email: Option<&EmailService>,
    request: OrderRequest,
) -> Result<Order, AppError> {
    check_slot(&request.delivery_time)?;

    let basket_id = BasketId::from_token(request.basket_id.clone());
    let cart = CartRepository::new(pool)
        .find_by_basket_id(&basket_id)
        .await?
        .ok_or_else(|| AppError::Integrity(format!("no cart for basket {basket_id}")))?;

    if cart.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_owned()));
    }

    let session = SessionRepository::new(pool)
        .find_by_device_id(cart.device_id)
        .await?
        .ok_or_else(|| AppError::Integrity(format!("no session for device {}", cart.device_id)))?;

    let profile = CustomerRepository::new(pool)
        .find_by_identity(session.device_id, session.guest_id)
        .await?
        .ok_or_else(|| {
            AppError::Integrity(format!("no customer profile for device {}", cart.device_id))
        })?;

    let delivery_address = check_delivery(request.order_type, &profile)?;
    let delivery_fee = match request.order_type {
        OrderType::Delivery => profile.delivery_fee.unwrap_or(Decimal::ZERO),
        OrderType::Pickup => Decimal::ZERO,
    };

    let amount = build_amount(&cart.items, delivery_fee, request.tip_amount, request.discount);

    let order = OrderRepository::new(pool)
        .create(NewOrder {
            device_id: cart.device_id,
            order_date: Utc::now()
                .with_timezone(&RESTAURANT_TZ)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            order_type: request.order_type,
            items: cart.items,
            amount,
            delivery_address,
            delivery_note: request.delivery_note,
            delivery_time: request.delivery_time,
            user_name: profile.name,
            user_phone: profile.phone_number,
            payment_method: request.selected_method,
        })
        .await?;

    if let Some(email) = email {
        email.spawn_order_notification(order.clone());
    }

    Ok(order)
}

/// A scheduled slot needs an actual time.
fn check_slot(slot: &DeliveryTime) -> Result<(), AppError> {
    if !slot.asap && slot.scheduled_time.as_deref().is_none_or(str::is_empty) {
        return Err(AppError::invalid_field(
            "scheduledTime",
            "Please pick a delivery time",
        ));
    }
    Ok(())
}

/// Delivery orders need a saved address that the webhook marked deliverable.
///
/// This re-check is authoritative: a stale client that skipped the webhook,
/// or whose address went out of range, is rejected here.
fn check_delivery(
    order_type: OrderType,
    profile: &CustomerProfile,
) -> Result<Option<String>, AppError> {
    if order_type == OrderType::Pickup {
        return Ok(None);
    }

    let address = profile.address.as_ref().ok_or_else(|| {
        AppError::invalid_field("displayAddress", "Please enter a delivery address")
    })?;

    if profile.deliverable != Some(true) {
        return Err(AppError::BadRequest(
            "Address is outside the delivery area".to_owned(),
        ));
    }

    Ok(Some(address.display_address.clone()))
}

/// Fee breakdown for a set of cart lines. Line prices are already totals.
fn build_amount(
    items: &[CartItem],
    delivery_fee: Decimal,
    tip_amount: Decimal,
    discount: Option<Discount>,
) -> OrderAmount {
    let order_total: Decimal = items.iter().map(|item| item.price).sum();

    OrderAmount {
        order_total,
        delivery_fee,
        service_fee: service_fee(order_total),
        tip_amount,
        discount,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tadka_core::{DeviceId, GuestId, ProfileId};

    use super::*;

    fn line(price: Decimal) -> CartItem {
        CartItem {
            item_id: "ITEM_1".to_owned(),
            item_name: "Dal Makhani".to_owned(),
            quantity: 1,
            price,
            customization: None,
        }
    }

    fn profile(deliverable: Option<bool>) -> CustomerProfile {
        CustomerProfile {
            id: ProfileId::generate(),
            display_id: "U00000001".to_owned(),
            device_id: DeviceId::generate(),
            guest_id: GuestId::generate(),
            name: "Maria".to_owned(),
            phone_number: "+4915123456789".to_owned(),
            order_type: OrderType::Delivery,
            address: Some(crate::models::Address {
                pincode: "70173".to_owned(),
                building_number: "12".to_owned(),
                street: "Königstraße".to_owned(),
                town: "Stuttgart".to_owned(),
                display_address: "Königstraße 12, 70173 Stuttgart".to_owned(),
            }),
            user_location: None,
            deliverable,
            is_free_delivery: Some(false),
            delivery_fee: Some(Decimal::new(150, 2)),
        }
    }

    #[test]
    fn test_amount_sums_line_totals_and_caps_service_fee() {
        let items = vec![line(Decimal::new(2500, 2)), line(Decimal::new(3000, 2))];
        let amount = build_amount(&items, Decimal::new(150, 2), Decimal::ZERO, None);
        assert_eq!(amount.order_total, Decimal::new(5500, 2));
        // 2.5% of 55.00 is 1.375, capped at 0.99.
        assert_eq!(amount.service_fee, Decimal::new(99, 2));
        assert_eq!(amount.delivery_fee, Decimal::new(150, 2));
    }

    #[test]
    fn test_small_order_service_fee_is_uncapped() {
        let amount = build_amount(&[line(Decimal::new(1000, 2))], Decimal::ZERO, Decimal::ZERO, None);
        assert_eq!(amount.service_fee, Decimal::new(25, 2));
    }

    #[test]
    fn test_amount_is_a_snapshot_of_the_lines() {
        // Mutating the cart afterwards must not affect the built amount.
        let mut items = vec![line(Decimal::new(1000, 2))];
        let amount = build_amount(&items, Decimal::ZERO, Decimal::ZERO, None);
        items.push(line(Decimal::new(9900, 2)));
        assert_eq!(amount.order_total, Decimal::new(1000, 2));
    }

    #[test]
    fn test_scheduled_slot_without_time_is_rejected() {
        let slot = DeliveryTime {
            asap: false,
            scheduled_time: None,
        };
        assert!(check_slot(&slot).is_err());

        let slot = DeliveryTime {
            asap: false,
            scheduled_time: Some("18:30".to_owned()),
        };
        assert!(check_slot(&slot).is_ok());
    }

    #[test]
    fn test_pickup_skips_the_deliverability_check() {
        let result = check_delivery(OrderType::Pickup, &profile(Some(false)));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_delivery_requires_deliverable_address() {
        let ok = check_delivery(OrderType::Delivery, &profile(Some(true))).unwrap();
        assert_eq!(ok.unwrap(), "Königstraße 12, 70173 Stuttgart");

        assert!(check_delivery(OrderType::Delivery, &profile(Some(false))).is_err());
        // Profile saved before the webhook ever ran.
        assert!(check_delivery(OrderType::Delivery, &profile(None)).is_err());
    }

    #[test]
    fn test_delivery_without_saved_address_reports_the_field() {
        let mut p = profile(Some(true));
        p.address = None;
        let err = check_delivery(OrderType::Delivery, &p).unwrap_err();
        match err {
            AppError::Validation(errors) => assert_eq!(errors[0].key, "displayAddress"),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let raw = r#"{
            "basketId": "abc123",
            "orderType": "DELIVERY",
            "selectedMethod": "CASH",
            "deliveryTime": {"asap": true},
            "tipAmount": 1.5
        }"#;
        let request: OrderRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.selected_method, PaymentMethod::Cash);
        assert_eq!(request.tip_amount, Decimal::new(15, 1));
        assert!(request.delivery_note.is_empty());
        assert!(request.discount.is_none());
    }
}
