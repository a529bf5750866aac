//! Address book domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orchard_core::{AddressId, UserId};

/// A shipping address owned by a user.
///
/// At most one address per user has `is_default = true` at any instant.
/// Deleting the default leaves the user with no default; no other address is
/// auto-promoted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning user.
    pub user_id: UserId,
    /// Recipient name.
    pub recipient_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Province.
    pub province: String,
    /// City.
    pub city: String,
    /// District.
    pub district: String,
    /// Street-level detail.
    pub detail: String,
    /// Whether this is the user's default shipping address.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddress {
    /// Recipient name.
    pub recipient_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Province.
    pub province: String,
    /// City.
    pub city: String,
    /// District.
    pub district: String,
    /// Street-level detail.
    pub detail: String,
}

/// Partial update for an address; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAddress {
    /// New recipient name.
    pub recipient_name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New province.
    pub province: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New district.
    pub district: Option<String>,
    /// New street-level detail.
    pub detail: Option<String>,
}
