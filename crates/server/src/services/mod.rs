//! Domain services: geocoding, delivery computation, order assembly,
//! restaurant hours, input validation, and the confirmation email.

pub mod delivery;
pub mod email;
pub mod geocode;
pub mod hours;
pub mod orders;
pub mod validation;

pub use delivery::DeliveryService;
pub use email::EmailService;
pub use geocode::Geocoder;
