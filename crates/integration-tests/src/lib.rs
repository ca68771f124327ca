//! Integration tests for the Tadka ordering backend.
//!
//! These run against a real `PostgreSQL` instance and are `#[ignore]`d by
//! default.
//!
//! ```bash
//! # Start the database, then:
//! TADKA_TEST_DATABASE_URL=postgres://localhost/tadka_test \
//!     cargo test -p tadka-integration-tests -- --ignored
//! ```
//!
//! Each test mints its own identities, so tests can share a database and
//! run in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Connect to the test database and bring its schema up to date.
///
/// # Panics
///
/// Panics when no database URL is configured or the connection fails; the
/// tests cannot do anything useful without one.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("TADKA_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TADKA_TEST_DATABASE_URL or DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to the test database");

    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}
