//! Domain models persisted by the server.

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;
pub mod session;

pub use cart::{Cart, CartItem, CartPayload, Customization};
pub use catalog::{Category, CategoryRef, MenuItem};
pub use customer::{Address, CustomerDetails, CustomerProfile, DeliveryDetails};
pub use order::{DeliveryTime, Discount, Order, OrderAmount, OrderSummary};
pub use session::{Session, SessionPayload};
