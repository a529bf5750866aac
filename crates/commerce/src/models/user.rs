//! Back-office view of user accounts.
//!
//! Identity issuance and authentication live elsewhere; the core reads users
//! for statistics and toggles the ban flag for the admin surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orchard_core::{UserId, UserRole};

/// A shopper or admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Boundary-enforced role.
    pub role: UserRole,
    /// False for banned accounts.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
