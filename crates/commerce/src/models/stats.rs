//! Aggregate statistics models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::order::Order;

/// Order counts broken down by lifecycle status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrderStatusCounts {
    /// All orders regardless of status.
    pub total: i64,
    pub pending: i64,
    pub paid: i64,
    pub shipped: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// User counts broken down by activity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserCounts {
    /// All users.
    pub total: i64,
    /// Users with `is_active = true`.
    pub active: i64,
    /// Banned users.
    pub banned: i64,
}

/// A back-office dashboard summary.
///
/// All figures are computed against a single read snapshot so the numbers
/// shown together are mutually consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Sum of `total_amount` over paid, shipped, and completed orders.
    pub total_sales: Decimal,
    /// Per-status order counts.
    pub order_counts: OrderStatusCounts,
    /// User activity counts.
    pub user_counts: UserCounts,
    /// The ten most recent orders, newest first.
    pub recent_orders: Vec<Order>,
}
