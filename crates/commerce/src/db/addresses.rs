//! Database operations for the address book.
//!
//! The single-default invariant is enforced twice: a partial unique index on
//! `(user_id) WHERE is_default`, and transactional default-clearing here so
//! concurrent `set_default` calls serialize instead of failing.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use orchard_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::address::{Address, NewAddress, UpdateAddress};

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    recipient_name: String,
    phone: String,
    province: String,
    city: String,
    district: String,
    detail: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            user_id: UserId::new(row.user_id),
            recipient_name: row.recipient_name,
            phone: row.phone,
            province: row.province,
            city: row.city,
            district: row.district,
            detail: row.detail,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const ADDRESS_COLUMNS: &str = "id, user_id, recipient_name, phone, province, city, district, detail, is_default, created_at";

/// Repository for address book database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's addresses, default first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses
             WHERE user_id = $1
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Get one of the user's addresses by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Insert an address.
    ///
    /// The user's first address becomes the default regardless of
    /// `make_default`; otherwise the previous default is cleared in the same
    /// transaction when `make_default` is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &NewAddress,
        make_default: bool,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let is_default = make_default || existing == 0;
        if is_default {
            clear_default_tx(&mut tx, user_id).await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO addresses
                 (id, user_id, recipient_name, phone, province, city, district, detail, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(AddressId::generate())
        .bind(user_id)
        .bind(&input.recipient_name)
        .bind(&input.phone)
        .bind(&input.province)
        .bind(&input.city)
        .bind(&input.district)
        .bind(&input.detail)
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Address::from(row))
    }

    /// Update an address's fields; `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn update(
        &self,
        user_id: UserId,
        address_id: AddressId,
        input: &UpdateAddress,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE addresses SET
                 recipient_name = COALESCE($3, recipient_name),
                 phone = COALESCE($4, phone),
                 province = COALESCE($5, province),
                 city = COALESCE($6, city),
                 district = COALESCE($7, district),
                 detail = COALESCE($8, detail)
             WHERE id = $1 AND user_id = $2
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(address_id)
        .bind(user_id)
        .bind(input.recipient_name.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.province.as_deref())
        .bind(input.city.as_deref())
        .bind(input.district.as_deref())
        .bind(input.detail.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(Address::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete an address.
    ///
    /// Deleting the default leaves the user with no default address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn delete(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Make an address the user's default, clearing any previous default in
    /// the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user; nothing is cleared in that case.
    pub async fn set_default(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Verify ownership before touching any default flags.
        let owned: Option<uuid::Uuid> =
            sqlx::query_scalar("SELECT id FROM addresses WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(address_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(RepositoryError::NotFound);
        }

        clear_default_tx(&mut tx, user_id).await?;

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE addresses SET is_default = TRUE
             WHERE id = $1 AND user_id = $2
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Address::from(row))
    }
}

/// Clear `is_default` on every address the user owns.
async fn clear_default_tx(conn: &mut PgConnection, user_id: UserId) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Load one of the user's addresses inside an existing transaction.
///
/// Used by checkout to read the shipping snapshot source in the same
/// transaction that creates the order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_owned_tx(
    conn: &mut PgConnection,
    user_id: UserId,
    address_id: AddressId,
) -> Result<Option<Address>, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses
         WHERE id = $1 AND user_id = $2"
    ))
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Address::from))
}
