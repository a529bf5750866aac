//! Narrow gateway over catalog product storage.
//!
//! The catalog is owned by an external collaborator; the core is limited to
//! this interface: read a product snapshot, conditionally decrement stock,
//! and return stock on cancellation. No other product writes happen here.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use orchard_core::ProductId;

use super::RepositoryError;
use crate::models::catalog::ProductSnapshot;

/// Internal row type for product snapshot queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: uuid::Uuid,
    name: String,
    price: Decimal,
    stock: i32,
    is_active: bool,
}

impl From<ProductRow> for ProductSnapshot {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            stock: row.stock,
            is_active: row.is_active,
        }
    }
}

/// Read a product snapshot outside any transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    pool: &PgPool,
    product_id: ProductId,
) -> Result<Option<ProductSnapshot>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price, stock, is_active FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ProductSnapshot::from))
}

/// Read a product snapshot with a row lock, for check-then-act sequences
/// inside a checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_for_update_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
) -> Result<Option<ProductSnapshot>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, price, stock, is_active FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(ProductSnapshot::from))
}

/// Atomically decrement stock if enough is available.
///
/// Returns `false` when the guard `stock >= quantity` did not hold at write
/// time, so concurrent checkouts can never drive stock below zero even
/// without a prior row lock.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn decrement_stock_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: i32,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - $2
         WHERE id = $1 AND stock >= $2",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Return stock for a cancelled order line.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn restock_tx(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE products SET stock = stock + $2 WHERE id = $1")
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
