//! Database operations for the ordering backend (`PostgreSQL`).
//!
//! ## Tables
//!
//! - `sessions` - device/guest identity pairs with TTLs
//! - `carts` - one replace-whole-list cart per device, basket token
//! - `customer_profiles` - name/phone/address plus webhook-computed delivery fields
//! - `orders` - immutable order snapshots
//! - `counters` - named sequences backing human-readable display ids
//! - `categories` / `menu_items` - the catalog
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p tadka-cli -- migrate
//! ```

pub mod carts;
pub mod catalog;
pub mod customers;
pub mod orders;
pub mod sessions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgExecutor, PgPool};
use thiserror::Error;

pub use carts::CartRepository;
pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use sessions::SessionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate basket token).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Atomically increment and read a named sequence.
///
/// The single-statement upsert is what prevents duplicate display ids under
/// concurrent order creation - the one race this workflow explicitly guards.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn next_seq<'e, E>(executor: E, name: &str) -> Result<i64, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let seq: (i64,) = sqlx::query_as(
        r"
        INSERT INTO counters (name, seq)
        VALUES ($1, 1)
        ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
        RETURNING seq
        ",
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(seq.0)
}
