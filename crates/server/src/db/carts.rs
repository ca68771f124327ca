//! Cart repository with replace-whole-list semantics.
//!
//! One cart per device. Items are stored as a jsonb document because the
//! server never queries into individual lines - the client always submits
//! the full list and the last write wins.

use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use tadka_core::{BasketId, CartId, DeviceId, GuestId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

#[derive(FromRow)]
struct CartRow {
    id: CartId,
    device_id: DeviceId,
    guest_id: GuestId,
    basket_id: BasketId,
    items: Json<Vec<CartItem>>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            device_id: row.device_id,
            guest_id: row.guest_id,
            basket_id: row.basket_id,
            items: row.items.0,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the cart for a device, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            r"
            SELECT id, device_id, guest_id, basket_id, items
            FROM carts
            WHERE device_id = $1
            ",
        )
        .bind(device_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Look a cart up by its basket token (external checkout surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_basket_id(
        &self,
        basket_id: &BasketId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            r"
            SELECT id, device_id, guest_id, basket_id, items
            FROM carts
            WHERE basket_id = $1
            ",
        )
        .bind(basket_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Create an empty cart for a device, minting its basket token.
    ///
    /// The token is derived once from the cart id and stays stable for the
    /// cart's lifetime.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the device already has a cart.
    pub async fn create(
        &self,
        device_id: DeviceId,
        guest_id: GuestId,
    ) -> Result<Cart, RepositoryError> {
        let cart_id = CartId::generate();
        let basket_id = BasketId::for_cart(cart_id);

        let row: CartRow = sqlx::query_as(
            r"
            INSERT INTO carts (id, device_id, guest_id, basket_id, items)
            VALUES ($1, $2, $3, $4, '[]'::jsonb)
            RETURNING id, device_id, guest_id, basket_id, items
            ",
        )
        .bind(cart_id)
        .bind(device_id)
        .bind(guest_id)
        .bind(&basket_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("device already has a cart".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Replace the entire item list of a cart. No server-side diffing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart no longer exists.
    pub async fn replace_items(
        &self,
        cart_id: CartId,
        items: &[CartItem],
    ) -> Result<Cart, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            r"
            UPDATE carts
            SET items = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, device_id, guest_id, basket_id, items
            ",
        )
        .bind(cart_id)
        .bind(Json(items))
        .fetch_optional(self.pool)
        .await?;

        row.map(Cart::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete the cart record entirely. The basket token is lost with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_device_id(&self, device_id: DeviceId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM carts WHERE device_id = $1")
            .bind(device_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
