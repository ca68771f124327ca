//! Session repository.
//!
//! Sessions pair a short-lived device id with a long-lived guest id. Every
//! successful `POST /v1/session` refreshes both expiries; expired records are
//! reused rather than recreated so the guest keeps their identity.

use sqlx::{FromRow, PgPool};

use tadka_core::{DeviceId, GuestId, SessionId, display_id};

use super::{RepositoryError, next_seq};
use crate::models::Session;

/// Counter name backing `S%08d` display ids.
const SESSION_COUNTER: &str = "session";

#[derive(FromRow)]
struct SessionRow {
    id: SessionId,
    display_id: String,
    device_id: DeviceId,
    guest_id: GuestId,
    latitude: Option<String>,
    longitude: Option<String>,
    tid_expires_at: i64,
    device_expires_at: i64,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            display_id: row.display_id,
            device_id: row.device_id,
            guest_id: row.guest_id,
            latitude: row.latitude,
            longitude: row.longitude,
            tid_expires_at: row.tid_expires_at,
            device_expires_at: row.device_expires_at,
        }
    }
}

/// Repository for session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a session by its long-lived guest id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_guest_id(
        &self,
        guest_id: GuestId,
    ) -> Result<Option<Session>, RepositoryError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r"
            SELECT id, display_id, device_id, guest_id, latitude, longitude,
                   tid_expires_at, device_expires_at
            FROM sessions
            WHERE guest_id = $1
            ",
        )
        .bind(guest_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    /// Find a session by its short-lived device id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Session>, RepositoryError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r"
            SELECT id, display_id, device_id, guest_id, latitude, longitude,
                   tid_expires_at, device_expires_at
            FROM sessions
            WHERE device_id = $1
            ",
        )
        .bind(device_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    /// Create a fresh identity pair with a sequential display id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        latitude: Option<String>,
        longitude: Option<String>,
        tid_expires_at: i64,
        device_expires_at: i64,
    ) -> Result<Session, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let seq = next_seq(&mut *tx, SESSION_COUNTER).await?;
        let label = display_id('S', seq);

        let row: SessionRow = sqlx::query_as(
            r"
            INSERT INTO sessions (id, display_id, device_id, guest_id, latitude, longitude,
                                  tid_expires_at, device_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, display_id, device_id, guest_id, latitude, longitude,
                      tid_expires_at, device_expires_at
            ",
        )
        .bind(SessionId::generate())
        .bind(&label)
        .bind(DeviceId::generate())
        .bind(GuestId::generate())
        .bind(latitude)
        .bind(longitude)
        .bind(tid_expires_at)
        .bind(device_expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Refresh both expiries on an existing session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the session no longer exists.
    pub async fn touch(
        &self,
        id: SessionId,
        tid_expires_at: i64,
        device_expires_at: i64,
    ) -> Result<Session, RepositoryError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r"
            UPDATE sessions
            SET tid_expires_at = $2, device_expires_at = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, display_id, device_id, guest_id, latitude, longitude,
                      tid_expires_at, device_expires_at
            ",
        )
        .bind(id)
        .bind(tid_expires_at)
        .bind(device_expires_at)
        .fetch_optional(self.pool)
        .await?;

        row.map(Session::from).ok_or(RepositoryError::NotFound)
    }
}
