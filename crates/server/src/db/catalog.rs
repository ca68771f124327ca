//! Catalog repository.
//!
//! The menu and category lists are read-only at runtime; the cli seeds them.
//! Ordering is driven by the category's `ord` column so the kitchen controls
//! presentation without code changes.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use tadka_core::{CategoryId, MenuItemId};

use super::RepositoryError;
use crate::models::{Category, CategoryRef, MenuItem};

#[derive(FromRow)]
struct MenuItemRow {
    id: MenuItemId,
    name: String,
    description: String,
    image_url: String,
    is_delivery: bool,
    price: Decimal,
    category_id: CategoryId,
    category_ord: i32,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_delivery: row.is_delivery,
            category: CategoryRef {
                id: row.category_id,
                order: row.category_ord,
            },
            price: row.price,
        }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    image_url: String,
    is_delivery: bool,
    ord: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            is_delivery: row.is_delivery,
            order: row.ord,
        }
    }
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every menu item, sorted by its category's display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_menu(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r"
            SELECT m.id, m.name, m.description, m.image_url, m.is_delivery, m.price,
                   c.id AS category_id, c.ord AS category_ord
            FROM menu_items m
            JOIN categories c ON c.id = m.category_id
            ORDER BY c.ord, m.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// List the delivery-visible categories in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT id, name, image_url, is_delivery, ord
            FROM categories
            WHERE is_delivery = TRUE
            ORDER BY ord
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
