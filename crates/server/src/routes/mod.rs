//! HTTP route handlers for the ordering API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Session
//! POST /v1/session                  - Mint or refresh the device/guest identity
//!
//! # Cart
//! GET  /v1/cart                     - Read the device's cart
//! POST /v1/cart                     - Replace the cart's item list
//! GET  /v1/cart/basket/{basket_id}  - Read a cart by basket token
//!
//! # Customer details
//! POST /v1/user-details/create      - Save name/phone/address
//! GET  /v1/user-details/details     - Read saved contact details
//! GET  /v1/user-details/delivery    - Read delivery eligibility
//!
//! # Orders
//! POST /v1/order                    - Place an order
//! GET  /v1/order/{order_id}         - Read an order
//!
//! # Catalog and info
//! GET  /v1/menu/listing             - Menu items (cached)
//! GET  /v1/category/listing         - Categories (cached)
//! GET  /v1/info                     - Restaurant info and opening hours
//!
//! # Webhook
//! POST /webhook/delivery-charge     - Compute and store delivery eligibility
//! ```

pub mod cart;
pub mod catalog;
pub mod info;
pub mod order;
pub mod session;
pub mod user_details;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::update))
        .route("/basket/{basket_id}", get(cart::show_by_basket))
}

/// Create the customer details routes router.
pub fn user_details_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(user_details::save))
        .route("/details", get(user_details::details))
        .route("/delivery", get(user_details::delivery))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(order::create))
        .route("/{order_id}", get(order::show))
}

/// Create all routes for the ordering API.
pub fn routes() -> Router<AppState> {
    let v1 = Router::new()
        .route("/session", post(session::create))
        .nest("/cart", cart_routes())
        .nest("/user-details", user_details_routes())
        .nest("/order", order_routes())
        .route("/menu/listing", get(catalog::menu_listing))
        .route("/category/listing", get(catalog::category_listing))
        .route("/info", get(info::show));

    Router::new()
        .nest("/v1", v1)
        .route("/webhook/delivery-charge", post(webhook::delivery_charge))
}
