//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded into the
//! binary at compile time, so the CLI can run anywhere the database is
//! reachable.

use super::{CommandError, connect};

/// Run the server database migrations.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Connecting to database...");
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
