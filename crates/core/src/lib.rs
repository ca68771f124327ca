//! Tadka Core - Shared types library.
//!
//! This crate provides common types used across all Tadka components:
//! - `server` - Customer-facing REST backend (menu, cart, checkout)
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere. In particular it owns the two pieces of actual computation in the
//! ordering workflow: the haversine distance and the delivery-fee tiering.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, coordinates, fee policy, money, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
