//! Delivery-fee tiering and order fee policy.
//!
//! The tiering is a deterministic step function over the road-free
//! great-circle distance:
//!
//! - beyond the maximum radius delivery is refused (fee `None`),
//! - within the free radius the fee is zero,
//! - otherwise a base fee covers the 3-4 km band and every *started*
//!   kilometre above 4 km adds a fixed increment.
//!
//! The boundary inequalities (`<=` free radius, `>` max radius) are
//! customer-visible pricing; do not loosen them.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default radius within which delivery is free, in kilometres.
pub const DEFAULT_FREE_RADIUS_KM: f64 = 3.0;

/// Default maximum serviceable radius, in kilometres.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 10.0;

/// Base fee for entering the 3-4 km band, in euros.
const BAND_BASE_FEE_CENTS: i64 = 100;

/// Fee increment per started kilometre above 4 km, in euros.
const PER_KM_INCREMENT_CENTS: i64 = 50;

/// Service fee rate applied to the order subtotal (2.5%).
const SERVICE_FEE_RATE_MILLIS: i64 = 25;

/// Cap on the service fee, in euros.
const SERVICE_FEE_CAP_CENTS: i64 = 99;

/// Outcome of the fee tiering policy for one distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryQuote {
    /// Whether the address falls within the serviceable radius.
    pub deliverable: bool,
    /// Delivery fee in euros; `None` when not deliverable.
    #[serde(rename = "deliveryCharge")]
    pub fee: Option<Decimal>,
    /// Human-readable summary shown to the customer.
    pub message: String,
}

impl DeliveryQuote {
    /// Whether the quote grants free delivery.
    #[must_use]
    pub fn is_free_delivery(&self) -> bool {
        self.fee == Some(Decimal::ZERO)
    }
}

/// Map a distance to a deliverability flag and fee amount.
///
/// Rules, evaluated in order:
/// 1. `distance_km > max_radius_km` - not deliverable, fee `None`.
/// 2. `distance_km <= free_radius_km` - deliverable, fee `0`.
/// 3. Otherwise - base fee 1.00 for the 3-4 km band, plus 0.50 per started
///    kilometre above 4 km, rounded to 2 decimals.
#[must_use]
pub fn delivery_quote(distance_km: f64, free_radius_km: f64, max_radius_km: f64) -> DeliveryQuote {
    if distance_km > max_radius_km {
        return DeliveryQuote {
            deliverable: false,
            fee: None,
            message: format!("Delivery not available beyond {max_radius_km} km"),
        };
    }

    if distance_km <= free_radius_km {
        return DeliveryQuote {
            deliverable: true,
            fee: Some(Decimal::ZERO),
            message: "Free delivery available.".to_owned(),
        };
    }

    let mut fee = Decimal::new(BAND_BASE_FEE_CENTS, 2);
    if distance_km > 4.0 {
        // Every started kilometre above 4 km counts as a full increment.
        #[allow(clippy::cast_possible_truncation)]
        let increments = (distance_km - 4.0).ceil() as i64;
        fee += Decimal::from(increments) * Decimal::new(PER_KM_INCREMENT_CENTS, 2);
    }
    let fee = round_money(fee);

    DeliveryQuote {
        deliverable: true,
        fee: Some(fee),
        message: format!("Delivery charge: \u{20ac}{fee:.2}"),
    }
}

/// Service fee for an order: `min(round(subtotal * 2.5%, 2), 0.99)`.
#[must_use]
pub fn service_fee(subtotal: Decimal) -> Decimal {
    let fee = round_money(subtotal * Decimal::new(SERVICE_FEE_RATE_MILLIS, 3));
    fee.min(Decimal::new(SERVICE_FEE_CAP_CENTS, 2))
}

/// Round a currency amount to 2 decimal places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quote(distance_km: f64) -> DeliveryQuote {
        delivery_quote(distance_km, DEFAULT_FREE_RADIUS_KM, DEFAULT_MAX_RADIUS_KM)
    }

    #[test]
    fn test_free_within_radius() {
        let q = quote(2.5);
        assert!(q.deliverable);
        assert_eq!(q.fee, Some(Decimal::ZERO));
        assert!(q.is_free_delivery());
    }

    #[test]
    fn test_boundary_exactness() {
        // Exactly at the free radius is still free.
        assert_eq!(quote(3.0).fee, Some(Decimal::ZERO));
        // Just past it enters the base band.
        assert_eq!(quote(3.01).fee, Some(Decimal::new(100, 2)));
        // Exactly at the max radius is deliverable with a finite fee.
        let at_max = quote(10.0);
        assert!(at_max.deliverable);
        assert_eq!(at_max.fee, Some(Decimal::new(400, 2)));
        // Just past the max radius is blocked.
        let beyond = quote(10.01);
        assert!(!beyond.deliverable);
        assert_eq!(beyond.fee, None);
    }

    #[test]
    fn test_fee_formula_six_km() {
        // ceil(6 - 4) = 2 increments: 1.00 + 2 * 0.50 = 2.00
        assert_eq!(quote(6.0).fee, Some(Decimal::new(200, 2)));
    }

    #[test]
    fn test_started_kilometre_rounds_up() {
        // 4.01 km starts the first increment above the band.
        assert_eq!(quote(4.01).fee, Some(Decimal::new(150, 2)));
        // 4.0 km is still only the band base.
        assert_eq!(quote(4.0).fee, Some(Decimal::new(100, 2)));
    }

    #[test]
    fn test_fee_monotonicity() {
        let mut last = Decimal::ZERO;
        let mut d = 0.0_f64;
        while d <= DEFAULT_MAX_RADIUS_KM {
            let fee = quote(d).fee.unwrap();
            assert!(fee >= last, "fee decreased at {d} km");
            last = fee;
            d += 0.05;
        }
    }

    #[test]
    fn test_custom_radii() {
        let q = delivery_quote(5.0, 5.0, 8.0);
        assert!(q.is_free_delivery());
        let q = delivery_quote(8.5, 5.0, 8.0);
        assert!(!q.deliverable);
    }

    #[test]
    fn test_service_fee_below_cap() {
        // 2.5% of 20.00 is 0.50.
        assert_eq!(service_fee(Decimal::new(2000, 2)), Decimal::new(50, 2));
    }

    #[test]
    fn test_service_fee_capped() {
        // 2.5% of 100.00 is 2.50, capped at 0.99.
        assert_eq!(service_fee(Decimal::new(10000, 2)), Decimal::new(99, 2));
    }

    #[test]
    fn test_service_fee_rounding() {
        // 2.5% of 13.90 is 0.3475, rounded half away from zero to 0.35.
        assert_eq!(service_fee(Decimal::new(1390, 2)), Decimal::new(35, 2));
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(Decimal::new(12345, 4)), Decimal::new(123, 2));
        assert_eq!(round_money(Decimal::new(125, 3)), Decimal::new(13, 2));
    }
}
