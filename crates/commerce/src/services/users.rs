//! User administration service (ban/unban).

use sqlx::PgPool;

use orchard_core::{UserId, UserRole};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{CommerceError, Result};
use crate::models::user::User;

/// Admin operations over user accounts. Role checks for the *caller* happen
/// at the transport boundary.
pub struct UserAdminService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserAdminService<'a> {
    /// Create a new user admin service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Ban an account. Admin accounts cannot be banned.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` when the target is an admin,
    /// `CommerceError::NotFound` when the user does not exist.
    pub async fn ban(&self, user_id: UserId) -> Result<User> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(CommerceError::NotFound("user"))?;

        if user.role == UserRole::Admin {
            return Err(CommerceError::Validation(
                "admin accounts cannot be banned".to_owned(),
            ));
        }

        let banned = self.users.set_active(user_id, false).await.map_err(|e| match e {
            RepositoryError::NotFound => CommerceError::NotFound("user"),
            other => CommerceError::Repository(other),
        })?;
        tracing::info!(user_id = %user_id, username = %banned.username, "User banned");
        Ok(banned)
    }

    /// Lift a ban.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the user does not exist.
    pub async fn unban(&self, user_id: UserId) -> Result<User> {
        let user = self.users.set_active(user_id, true).await.map_err(|e| match e {
            RepositoryError::NotFound => CommerceError::NotFound("user"),
            other => CommerceError::Repository(other),
        })?;
        tracing::info!(user_id = %user_id, username = %user.username, "User unbanned");
        Ok(user)
    }
}
