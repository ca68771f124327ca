//! Catalog seeding from a YAML file.
//!
//! The catalog file holds categories with their menu items:
//!
//! ```yaml
//! categories:
//!   - name: Starters
//!     imageUrl: https://cdn.example.com/starters.jpg
//!     isDelivery: true
//!     order: 1
//!     items:
//!       - name: Samosa
//!         description: Crispy potato pastry
//!         imageUrl: https://cdn.example.com/samosa.jpg
//!         isDelivery: true
//!         price: 4.50
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use tadka_core::{CategoryId, MenuItemId};

use super::{CommandError, connect};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    image_url: String,
    #[serde(default = "default_true")]
    is_delivery: bool,
    order: i32,
    #[serde(default)]
    items: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemEntry {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
    #[serde(default = "default_true")]
    is_delivery: bool,
    price: Decimal,
}

const fn default_true() -> bool {
    true
}

/// Seed the catalog tables from a YAML file.
///
/// Categories are upserted by name so reseeding an updated file is safe;
/// `--replace` wipes both tables first.
///
/// # Errors
///
/// Returns an error when the file cannot be read or a statement fails.
pub async fn run(file: &Path, replace: bool) -> Result<(), CommandError> {
    let raw = std::fs::read_to_string(file)?;
    let catalog: CatalogFile = serde_yaml::from_str(&raw)?;

    tracing::info!("Connecting to database...");
    let pool = connect().await?;

    if replace {
        tracing::info!("Clearing existing catalog...");
        sqlx::query("DELETE FROM menu_items").execute(&pool).await?;
        sqlx::query("DELETE FROM categories").execute(&pool).await?;
    }

    let mut item_count = 0usize;
    for category in &catalog.categories {
        let category_id = upsert_category(&pool, category).await?;

        for item in &category.items {
            insert_item(&pool, category_id, item).await?;
            item_count += 1;
        }
    }

    tracing::info!(
        categories = catalog.categories.len(),
        items = item_count,
        "Catalog seeded!"
    );
    Ok(())
}

async fn upsert_category(
    pool: &PgPool,
    category: &CategoryEntry,
) -> Result<CategoryId, CommandError> {
    let (id,): (CategoryId,) = sqlx::query_as(
        r"
        INSERT INTO categories (id, name, image_url, is_delivery, ord)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (name) DO UPDATE SET
            image_url = EXCLUDED.image_url,
            is_delivery = EXCLUDED.is_delivery,
            ord = EXCLUDED.ord
        RETURNING id
        ",
    )
    .bind(CategoryId::generate())
    .bind(&category.name)
    .bind(&category.image_url)
    .bind(category.is_delivery)
    .bind(category.order)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn insert_item(
    pool: &PgPool,
    category_id: CategoryId,
    item: &ItemEntry,
) -> Result<(), CommandError> {
    sqlx::query(
        r"
        INSERT INTO menu_items (id, name, description, image_url, is_delivery, price, category_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(MenuItemId::generate())
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(item.is_delivery)
    .bind(item.price)
    .bind(category_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_file_parses() {
        let raw = r"
categories:
  - name: Starters
    imageUrl: https://cdn.example.com/starters.jpg
    order: 1
    items:
      - name: Samosa
        description: Crispy potato pastry
        price: 4.50
      - name: Pakora
        price: 5.00
        isDelivery: false
  - name: Drinks
    order: 2
";
        let catalog: CatalogFile = serde_yaml::from_str(raw).unwrap();
        assert_eq!(catalog.categories.len(), 2);

        let starters = &catalog.categories[0];
        assert_eq!(starters.items.len(), 2);
        assert!(starters.is_delivery);
        assert_eq!(starters.items[0].price, Decimal::new(450, 2));
        assert!(!starters.items[1].is_delivery);
        assert!(catalog.categories[1].items.is_empty());
    }
}
