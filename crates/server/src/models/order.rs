//! Immutable order records.
//!
//! An order snapshots the cart lines and the computed fee breakdown at
//! creation time. It never references the live cart afterwards - the cart may
//! be deleted right after checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tadka_core::{DeviceId, OrderId, OrderStatus, OrderType, PaymentMethod};

use super::cart::CartItem;

/// Applied discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub code: String,
    pub amount: Decimal,
}

/// Requested delivery slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTime {
    pub asap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
}

/// Fee breakdown computed at order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAmount {
    /// Sum of line totals.
    pub order_total: Decimal,
    pub delivery_fee: Decimal,
    /// `min(round(subtotal * 2.5%, 2), 0.99)`.
    pub service_fee: Decimal,
    pub tip_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

/// A persisted order. Immutable after creation.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    /// Sequential human-readable id, e.g. `B00000042`.
    pub display_id: String,
    pub device_id: DeviceId,
    pub order_date: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub amount: OrderAmount,
    pub delivery_address: Option<String>,
    pub delivery_note: String,
    pub delivery_time: DeliveryTime,
    pub user_name: String,
    pub user_phone: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// Wire shape returned after checkout and by the order read endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub display_id: String,
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub delivery_time: DeliveryTime,
    pub delivery_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub selected_method: PaymentMethod,
    pub order_items: Vec<CartItem>,
    pub order_amount: OrderAmount,
    pub created_at: DateTime<Utc>,
    pub order_date: String,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            display_id: order.display_id.clone(),
            order_id: order.id,
            order_type: order.order_type,
            status: order.status,
            delivery_time: order.delivery_time.clone(),
            delivery_note: order.delivery_note.clone(),
            delivery_address: order.delivery_address.clone(),
            user_name: order.user_name.clone(),
            user_phone: order.user_phone.clone(),
            selected_method: order.payment_method,
            order_items: order.items.clone(),
            order_amount: order.amount.clone(),
            created_at: order.created_at,
            order_date: order.order_date.clone(),
        }
    }
}
