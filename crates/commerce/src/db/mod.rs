//! Database operations for the commerce `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Back-office view of shopper accounts (identity lives elsewhere)
//! - `products` - Catalog rows, touched only through the narrow gateway
//! - `addresses` - Address book with the single-default invariant
//! - `carts` / `cart_items` - One mutable cart per user
//! - `orders` / `order_items` - Immutable priced snapshots plus lifecycle state
//!
//! # Migrations
//!
//! Migrations are stored in `crates/commerce/migrations/` and run via:
//! ```bash
//! cargo run -p orchard-cli -- migrate
//! ```
//!
//! Every write that touches more than one row (default-clearing, checkout,
//! cancel restock) runs inside a single transaction; the `*_tx` helpers in
//! the submodules take a `&mut PgConnection` so the caller owns the
//! transaction boundary.

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod orders;
pub mod stats;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate order number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation onto `Conflict`, passing other
    /// database errors through unchanged.
    #[must_use]
    pub fn from_unique_violation(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Pool size upper bound
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
