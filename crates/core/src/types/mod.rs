//! Core types for the Tadka ordering backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod fees;
pub mod geo;
pub mod id;
pub mod status;

pub use fees::{
    DEFAULT_FREE_RADIUS_KM, DEFAULT_MAX_RADIUS_KM, DeliveryQuote, delivery_quote, round_money,
    service_fee,
};
pub use geo::{Coordinates, distance_km};
pub use id::*;
pub use status::*;
