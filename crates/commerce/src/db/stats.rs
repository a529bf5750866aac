//! Read-only aggregate rollups over orders and users.
//!
//! Every figure in a summary is computed inside one `REPEATABLE READ`
//! transaction, so a dashboard never shows counts from two different
//! instants.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{RepositoryError, orders, users};
use crate::models::stats::{OrderStatusCounts, StatsSummary};

/// How many orders the recent-orders feed carries.
const RECENT_ORDERS_LIMIT: i64 = 10;

/// Internal row type for the per-status order rollup.
#[derive(Debug, sqlx::FromRow)]
struct OrderCountsRow {
    total: i64,
    pending: i64,
    paid: i64,
    shipped: i64,
    completed: i64,
    cancelled: i64,
}

/// Compute the back-office dashboard summary against a single read snapshot.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any query fails.
pub async fn compute_summary(pool: &PgPool) -> Result<StatsSummary, RepositoryError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let total_sales: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0)
         FROM orders
         WHERE status IN ('paid', 'shipped', 'completed')",
    )
    .fetch_one(&mut *tx)
    .await?;

    let counts = sqlx::query_as::<_, OrderCountsRow>(
        "SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'paid') AS paid,
                COUNT(*) FILTER (WHERE status = 'shipped') AS shipped,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled
         FROM orders",
    )
    .fetch_one(&mut *tx)
    .await?;

    let user_counts = users::counts_tx(&mut tx).await?;
    let recent_orders = orders::recent_tx(&mut tx, RECENT_ORDERS_LIMIT).await?;

    tx.commit().await?;

    Ok(StatsSummary {
        total_sales,
        order_counts: OrderStatusCounts {
            total: counts.total,
            pending: counts.pending,
            paid: counts.paid,
            shipped: counts.shipped,
            completed: counts.completed,
            cancelled: counts.cancelled,
        },
        user_counts,
        recent_orders,
    })
}
