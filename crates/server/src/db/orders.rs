//! Order repository.
//!
//! Orders are write-once snapshots. The display id comes from the `order`
//! counter inside the same transaction as the insert, so concurrent
//! checkouts can never share a label.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use tadka_core::{DeviceId, OrderId, OrderStatus, OrderType, PaymentMethod, display_id};

use super::{RepositoryError, next_seq};
use crate::models::cart::CartItem;
use crate::models::{DeliveryTime, Order, OrderAmount};

/// Counter name backing `B%08d` display ids.
const ORDER_COUNTER: &str = "order";

/// Fields of a new order, computed by the order assembly service.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub device_id: DeviceId,
    pub order_date: String,
    pub order_type: OrderType,
    pub items: Vec<CartItem>,
    pub amount: OrderAmount,
    pub delivery_address: Option<String>,
    pub delivery_note: String,
    pub delivery_time: DeliveryTime,
    pub user_name: String,
    pub user_phone: String,
    pub payment_method: PaymentMethod,
}

#[derive(FromRow)]
struct OrderRow {
    id: OrderId,
    display_id: String,
    device_id: DeviceId,
    order_date: String,
    order_type: String,
    status: String,
    items: Json<Vec<CartItem>>,
    amount: Json<OrderAmount>,
    delivery_address: Option<String>,
    delivery_note: String,
    delivery_time: Json<DeliveryTime>,
    user_name: String,
    user_phone: String,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupted =
            |e: &dyn std::fmt::Display| RepositoryError::DataCorruption(e.to_string());

        Ok(Self {
            id: row.id,
            display_id: row.display_id,
            device_id: row.device_id,
            order_date: row.order_date,
            order_type: row.order_type.parse::<OrderType>().map_err(|e| corrupted(&e))?,
            status: row.status.parse::<OrderStatus>().map_err(|e| corrupted(&e))?,
            items: row.items.0,
            amount: row.amount.0,
            delivery_address: row.delivery_address,
            delivery_note: row.delivery_note,
            delivery_time: row.delivery_time.0,
            user_name: row.user_name,
            user_phone: row.user_phone,
            payment_method: row
                .payment_method
                .parse::<PaymentMethod>()
                .map_err(|e| corrupted(&e))?,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r"id, display_id, device_id, order_date, order_type, status, items,
       amount, delivery_address, delivery_note, delivery_time, user_name, user_phone,
       payment_method, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order with a fresh sequential display id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let seq = next_seq(&mut *tx, ORDER_COUNTER).await?;
        let label = display_id('B', seq);

        let row: OrderRow = sqlx::query_as(&format!(
            r"
            INSERT INTO orders (id, display_id, device_id, order_date, order_type, status,
                                items, amount, delivery_address, delivery_note, delivery_time,
                                user_name, user_phone, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {SELECT_COLUMNS}
            "
        ))
        .bind(OrderId::generate())
        .bind(&label)
        .bind(new_order.device_id)
        .bind(&new_order.order_date)
        .bind(new_order.order_type.as_str())
        .bind(OrderStatus::Pending.as_str())
        .bind(Json(&new_order.items))
        .bind(Json(&new_order.amount))
        .bind(&new_order.delivery_address)
        .bind(&new_order.delivery_note)
        .bind(Json(&new_order.delivery_time))
        .bind(&new_order.user_name)
        .bind(&new_order.user_phone)
        .bind(new_order.payment_method.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get an order by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(Order::try_from).transpose()
    }
}
