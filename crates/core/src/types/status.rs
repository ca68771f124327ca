//! Domain enums shared between the server and tooling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for parsing an enum from its stored string form.
#[derive(Debug, Error)]
#[error("invalid {kind} value: {value}")]
pub struct InvalidEnumValue {
    kind: &'static str,
    value: String,
}

impl InvalidEnumValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Pickup,
    Delivery,
}

impl OrderType {
    /// Stored/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "PICKUP",
            Self::Delivery => "DELIVERY",
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PICKUP" => Ok(Self::Pickup),
            "DELIVERY" => Ok(Self::Delivery),
            other => Err(InvalidEnumValue::new("order type", other)),
        }
    }
}

/// Lifecycle of an order. Orders are created as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    InProgress,
    Cooked,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
    Failed,
    Completed,
}

impl OrderStatus {
    /// Stored/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Cooked => "COOKED",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COOKED" => Ok(Self::Cooked),
            "READY_FOR_PICKUP" => Ok(Self::ReadyForPickup),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            "FAILED" => Ok(Self::Failed),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(InvalidEnumValue::new("order status", other)),
        }
    }
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Paypal,
    GooglePay,
    ApplePay,
}

impl PaymentMethod {
    /// Stored/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Paypal => "PAYPAL",
            Self::GooglePay => "GOOGLE_PAY",
            Self::ApplePay => "APPLE_PAY",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(Self::Cash),
            "CARD" => Ok(Self::Card),
            "PAYPAL" => Ok(Self::Paypal),
            "GOOGLE_PAY" => Ok(Self::GooglePay),
            "APPLE_PAY" => Ok(Self::ApplePay),
            other => Err(InvalidEnumValue::new("payment method", other)),
        }
    }
}

/// Spice preference attached to a cart line customization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpicyLevel {
    #[default]
    NoSpicy,
    Spicy,
    VerySpicy,
}

impl SpicyLevel {
    /// Stored/wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoSpicy => "no_spicy",
            Self::Spicy => "spicy",
            Self::VerySpicy => "very_spicy",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_round_trip() {
        for ty in [OrderType::Pickup, OrderType::Delivery] {
            assert_eq!(ty.as_str().parse::<OrderType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_order_status_round_trip() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::InProgress,
            OrderStatus::Cooked,
            OrderStatus::ReadyForPickup,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
            OrderStatus::Completed,
        ];
        for status in all {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_serde_wire_form() {
        assert_eq!(
            serde_json::to_string(&OrderType::Delivery).unwrap(),
            "\"DELIVERY\""
        );
        assert_eq!(
            serde_json::to_string(&SpicyLevel::VerySpicy).unwrap(),
            "\"very_spicy\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::GooglePay).unwrap(),
            "\"GOOGLE_PAY\""
        );
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        assert!("TAKEAWAY".parse::<OrderType>().is_err());
    }
}
