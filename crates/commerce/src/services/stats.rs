//! Aggregate statistics service.

use sqlx::PgPool;

use crate::db::stats;
use crate::error::Result;
use crate::models::stats::StatsSummary;

/// Read-only rollups for the admin dashboard.
pub struct StatsService<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsService<'a> {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the dashboard summary against a single read snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Repository` on database failure.
    pub async fn compute_summary(&self) -> Result<StatsSummary> {
        Ok(stats::compute_summary(self.pool).await?)
    }
}
