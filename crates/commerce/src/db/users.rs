//! Database operations for the back-office view of user accounts.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use orchard_core::{UserId, UserRole};

use super::RepositoryError;
use crate::models::stats::UserCounts;
use crate::models::user::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Toggle the ban flag on an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_active(
        &self,
        user_id: UserId,
        is_active: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET is_active = $2
             WHERE id = $1
             RETURNING id, username, role, is_active, created_at",
        )
        .bind(user_id)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::from).ok_or(RepositoryError::NotFound)
    }
}

/// Internal row type for the user-count rollup.
#[derive(Debug, sqlx::FromRow)]
struct UserCountsRow {
    total: i64,
    active: i64,
    banned: i64,
}

/// User activity counts inside an existing transaction, so they share the
/// stats rollup's read snapshot.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn counts_tx(conn: &mut PgConnection) -> Result<UserCounts, RepositoryError> {
    let row = sqlx::query_as::<_, UserCountsRow>(
        "SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_active) AS active,
                COUNT(*) FILTER (WHERE NOT is_active) AS banned
         FROM users",
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(UserCounts {
        total: row.total,
        active: row.active,
        banned: row.banned,
    })
}
