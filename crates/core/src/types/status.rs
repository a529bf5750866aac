//! Order lifecycle status and the transitions between statuses.
//!
//! The status graph is fixed:
//!
//! ```text
//! pending -> paid -> shipped -> completed
//!    |         |
//!    +---------+--> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Cancellation after shipping is
//! not allowed.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout, awaiting payment.
    #[default]
    Pending,
    /// Payment confirmed.
    Paid,
    /// Handed to the carrier with a tracking number.
    Shipped,
    /// Delivery confirmed.
    Completed,
    /// Cancelled before shipping; checkout stock has been returned.
    Cancelled,
}

impl OrderStatus {
    /// Whether this status has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a transition from `self` to `target` is legal.
    ///
    /// A same-status "transition" is not legal here; callers treat it as an
    /// idempotent retry instead (see the order service).
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Paid)
                | (Self::Paid, Self::Shipped)
                | (Self::Shipped, Self::Completed)
                | (Self::Pending | Self::Paid, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Shipped => write!(f, "shipped"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// A requested lifecycle action, as submitted by admin or user callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderAction {
    /// Payment confirmation: `pending -> paid`.
    MarkPaid,
    /// Fulfillment: `paid -> shipped`, requires a tracking number.
    Ship {
        /// Carrier tracking number stored on the order.
        tracking_no: String,
    },
    /// Delivery confirmation: `shipped -> completed`.
    Complete,
    /// Cancellation: `pending -> cancelled` or `paid -> cancelled`.
    Cancel,
}

impl OrderAction {
    /// The status this action moves an order into.
    #[must_use]
    pub const fn target(&self) -> OrderStatus {
        match self {
            Self::MarkPaid => OrderStatus::Paid,
            Self::Ship { .. } => OrderStatus::Shipped,
            Self::Complete => OrderStatus::Completed,
            Self::Cancel => OrderStatus::Cancelled,
        }
    }
}

/// User role for the back-office boundary.
///
/// Role checks happen at the transport boundary; the core only stores the
/// role and uses it to refuse banning admin accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    User,
    /// Back-office administrator.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
