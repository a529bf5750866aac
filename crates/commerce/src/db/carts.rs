//! Database operations for carts and cart items.
//!
//! One cart per user, created lazily. Quantity mutations bump the cart's
//! `updated_at`. Subtotals are never stored; the list query derives them from
//! live catalog prices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use orchard_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem, CartLine};

/// Internal row type for cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for cart item queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: uuid::Uuid,
    cart_id: uuid::Uuid,
    product_id: uuid::Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for cart lines joined against the catalog.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: uuid::Uuid,
    cart_id: uuid::Uuid,
    product_id: uuid::Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    product_name: String,
    unit_price: Decimal,
    product_stock: i32,
    product_active: bool,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            item: CartItem {
                id: CartItemId::new(row.id),
                cart_id: CartId::new(row.cart_id),
                product_id: ProductId::new(row.product_id),
                quantity: row.quantity,
                created_at: row.created_at,
            },
            product_name: row.product_name,
            unit_price: row.unit_price,
            product_stock: row.product_stock,
            product_active: row.product_active,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the user's cart, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // The no-op DO UPDATE makes the statement always return the row,
        // whether it inserted or found an existing cart.
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING id, user_id, created_at, updated_at",
        )
        .bind(CartId::generate())
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Cart::from(row))
    }

    /// Add a product to the cart, or increment the existing line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (including a
    /// foreign-key failure for an unknown product).
    pub async fn add_or_increment(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CartItemRow>(
            "INSERT INTO cart_items (id, cart_id, product_id, quantity)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
             RETURNING id, cart_id, product_id, quantity, created_at",
        )
        .bind(CartItemId::generate())
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;

        touch_tx(&mut tx, cart_id).await?;
        tx.commit().await?;

        Ok(CartItem::from(row))
    }

    /// Set a line's quantity. Callers validate `quantity >= 1`; removal is a
    /// separate operation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist in the
    /// user's cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CartItemRow>(
            "UPDATE cart_items SET quantity = $3
             FROM carts
             WHERE cart_items.id = $1
               AND cart_items.cart_id = carts.id
               AND carts.user_id = $2
             RETURNING cart_items.id, cart_items.cart_id, cart_items.product_id,
                       cart_items.quantity, cart_items.created_at",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        touch_tx(&mut tx, CartId::new(row.cart_id)).await?;
        tx.commit().await?;

        Ok(CartItem::from(row))
    }

    /// Remove a line from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist in the
    /// user's cart.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<uuid::Uuid> = sqlx::query_scalar(
            "DELETE FROM cart_items
             USING carts
             WHERE cart_items.id = $1
               AND cart_items.cart_id = carts.id
               AND carts.user_id = $2
             RETURNING cart_items.cart_id",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(cart_id) = cart_id else {
            return Err(RepositoryError::NotFound);
        };

        touch_tx(&mut tx, CartId::new(cart_id)).await?;
        tx.commit().await?;

        Ok(())
    }

    /// List the user's cart lines joined against the live catalog.
    ///
    /// Subtotals and availability flags derive from current product rows;
    /// checkout re-validates them inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.created_at,
                    p.name AS product_name,
                    p.price AS unit_price,
                    p.stock AS product_stock,
                    p.is_active AS product_active
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             JOIN products p ON p.id = ci.product_id
             WHERE c.user_id = $1
             ORDER BY ci.created_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }
}

/// Bump the cart's `updated_at` inside an existing transaction.
pub(crate) async fn touch_tx(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Lock and load cart items for checkout.
///
/// `item_ids = None` selects the whole cart. The `FOR UPDATE` lock makes a
/// concurrent checkout of the same cart wait here and then observe the rows
/// already deleted, failing with an empty selection instead of producing a
/// duplicate order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_items_tx(
    conn: &mut PgConnection,
    cart_id: CartId,
    item_ids: Option<&[CartItemId]>,
) -> Result<Vec<CartItem>, RepositoryError> {
    let rows = match item_ids {
        Some(ids) => {
            let raw: Vec<uuid::Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
            sqlx::query_as::<_, CartItemRow>(
                "SELECT id, cart_id, product_id, quantity, created_at
                 FROM cart_items
                 WHERE cart_id = $1 AND id = ANY($2)
                 ORDER BY created_at
                 FOR UPDATE",
            )
            .bind(cart_id)
            .bind(raw)
            .fetch_all(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, CartItemRow>(
                "SELECT id, cart_id, product_id, quantity, created_at
                 FROM cart_items
                 WHERE cart_id = $1
                 ORDER BY created_at
                 FOR UPDATE",
            )
            .bind(cart_id)
            .fetch_all(&mut *conn)
            .await?
        }
    };

    Ok(rows.into_iter().map(CartItem::from).collect())
}

/// Delete consumed cart items inside the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_items_tx(
    conn: &mut PgConnection,
    item_ids: &[CartItemId],
) -> Result<(), RepositoryError> {
    let raw: Vec<uuid::Uuid> = item_ids.iter().map(|id| id.as_uuid()).collect();
    sqlx::query("DELETE FROM cart_items WHERE id = ANY($1)")
        .bind(raw)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
