//! Customer profile repository.
//!
//! Profiles are keyed by the (device, guest) identity pair. The contact
//! fields are written by the user-details endpoint; the delivery fields are
//! overwritten wholesale by the delivery-charge webhook.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use tadka_core::{Coordinates, DeviceId, GuestId, OrderType, ProfileId, display_id};

use super::{RepositoryError, next_seq};
use crate::models::{Address, CustomerProfile};

/// Counter name backing `U%08d` display ids.
const PROFILE_COUNTER: &str = "user";

#[derive(FromRow)]
struct ProfileRow {
    id: ProfileId,
    display_id: String,
    device_id: DeviceId,
    guest_id: GuestId,
    name: String,
    phone_number: String,
    order_type: String,
    address: Option<Json<Address>>,
    user_location: Option<Json<Coordinates>>,
    deliverable: Option<bool>,
    is_free_delivery: Option<bool>,
    delivery_fee: Option<Decimal>,
}

impl TryFrom<ProfileRow> for CustomerProfile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let order_type: OrderType = row.order_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order type in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            display_id: row.display_id,
            device_id: row.device_id,
            guest_id: row.guest_id,
            name: row.name,
            phone_number: row.phone_number,
            order_type,
            address: row.address.map(|a| a.0),
            user_location: row.user_location.map(|l| l.0),
            deliverable: row.deliverable,
            is_free_delivery: row.is_free_delivery,
            delivery_fee: row.delivery_fee,
        })
    }
}

const SELECT_COLUMNS: &str = r"id, display_id, device_id, guest_id, name, phone_number,
       order_type, address, user_location, deliverable, is_free_delivery, delivery_fee";

/// Repository for customer profile operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the profile for an identity pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` on an unparseable stored order type.
    pub async fn find_by_identity(
        &self,
        device_id: DeviceId,
        guest_id: GuestId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer_profiles WHERE device_id = $1 AND guest_id = $2"
        ))
        .bind(device_id)
        .bind(guest_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(CustomerProfile::try_from).transpose()
    }

    /// Insert or update the contact part of a profile.
    ///
    /// For pickup orders the stored address is left untouched (the original
    /// keeps any previously saved delivery address around).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_contact(
        &self,
        device_id: DeviceId,
        guest_id: GuestId,
        name: &str,
        phone_number: &str,
        order_type: OrderType,
        address: Option<&Address>,
    ) -> Result<CustomerProfile, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Display id is only consumed on first insert; an upsert that hits
        // the conflict arm wastes one sequence value, which is harmless.
        let seq = next_seq(&mut *tx, PROFILE_COUNTER).await?;
        let label = display_id('U', seq);

        let row: ProfileRow = sqlx::query_as(&format!(
            r"
            INSERT INTO customer_profiles (id, display_id, device_id, guest_id, name,
                                           phone_number, order_type, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (device_id, guest_id) DO UPDATE SET
                name = EXCLUDED.name,
                phone_number = EXCLUDED.phone_number,
                order_type = EXCLUDED.order_type,
                address = COALESCE(EXCLUDED.address, customer_profiles.address),
                updated_at = now()
            RETURNING {SELECT_COLUMNS}
            "
        ))
        .bind(ProfileId::generate())
        .bind(&label)
        .bind(device_id)
        .bind(guest_id)
        .bind(name)
        .bind(phone_number)
        .bind(order_type.as_str())
        .bind(address.map(Json))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Overwrite the webhook-computed delivery fields for an identity pair.
    ///
    /// This is a wholesale replacement, not a merge - each new address
    /// submission recomputes everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no profile exists yet.
    pub async fn update_delivery(
        &self,
        device_id: DeviceId,
        guest_id: GuestId,
        user_location: Coordinates,
        deliverable: bool,
        is_free_delivery: bool,
        delivery_fee: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_profiles
            SET user_location = $3, deliverable = $4, is_free_delivery = $5,
                delivery_fee = $6, updated_at = now()
            WHERE device_id = $1 AND guest_id = $2
            ",
        )
        .bind(device_id)
        .bind(guest_id)
        .bind(Json(user_location))
        .bind(deliverable)
        .bind(is_free_delivery)
        .bind(delivery_fee)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
