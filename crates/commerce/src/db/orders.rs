//! Database operations for orders and order items.
//!
//! Orders are written once at checkout and then only move through lifecycle
//! status updates; line items are immutable after insert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use orchard_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderWithItems, ShippingSnapshot};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    order_no: String,
    total_amount: Decimal,
    status: OrderStatus,
    shipping_name: String,
    shipping_phone: String,
    shipping_province: String,
    shipping_city: String,
    shipping_district: String,
    shipping_detail: String,
    tracking_no: Option<String>,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            order_no: row.order_no,
            total_amount: row.total_amount,
            status: row.status,
            shipping: ShippingSnapshot {
                name: row.shipping_name,
                phone: row.shipping_phone,
                province: row.shipping_province,
                city: row.shipping_city,
                district: row.shipping_district,
                detail: row.shipping_detail,
            },
            tracking_no: row.tracking_no,
            created_at: row.created_at,
            paid_at: row.paid_at,
            shipped_at: row.shipped_at,
            completed_at: row.completed_at,
        }
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: uuid::Uuid,
    order_id: uuid::Uuid,
    product_id: Option<uuid::Uuid>,
    product_name: String,
    price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

pub(crate) const ORDER_COLUMNS: &str = "id, user_id, order_no, total_amount, status, \
     shipping_name, shipping_phone, shipping_province, shipping_city, shipping_district, \
     shipping_detail, tracking_no, created_at, paid_at, shipped_at, completed_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, price, quantity";

/// Parameters for inserting an order at checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Owning user.
    pub user_id: UserId,
    /// Generated unique order number.
    pub order_no: String,
    /// Total captured at checkout.
    pub total_amount: Decimal,
    /// Shipping address snapshot.
    pub shipping: ShippingSnapshot,
}

/// One priced line captured at checkout.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name at this instant.
    pub product_name: String,
    /// Unit price at this instant.
    pub price: Decimal,
    /// Units purchased.
    pub quantity: i32,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, order_id: OrderId) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order: Order::from(row),
            items: items.into_iter().map(OrderItem::from).collect(),
        }))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}

/// Insert the order row inside the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` on an order-number collision (the
/// checkout service retries with a fresh number), `RepositoryError::Database`
/// otherwise.
pub async fn insert_order_tx(
    conn: &mut PgConnection,
    new: &NewOrder,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "INSERT INTO orders
             (id, user_id, order_no, total_amount, status,
              shipping_name, shipping_phone, shipping_province,
              shipping_city, shipping_district, shipping_detail)
         VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9, $10)
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(OrderId::generate())
    .bind(new.user_id)
    .bind(&new.order_no)
    .bind(new.total_amount)
    .bind(&new.shipping.name)
    .bind(&new.shipping.phone)
    .bind(&new.shipping.province)
    .bind(&new.shipping.city)
    .bind(&new.shipping.district)
    .bind(&new.shipping.detail)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| RepositoryError::from_unique_violation(e, "order number already exists"))?;

    Ok(Order::from(row))
}

/// Insert the frozen line items inside the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if an insert fails.
pub async fn insert_items_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
    lines: &[NewOrderLine],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let row = sqlx::query_as::<_, OrderItemRow>(&format!(
            "INSERT INTO order_items (id, order_id, product_id, product_name, price, quantity)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_ITEM_COLUMNS}"
        ))
        .bind(OrderItemId::generate())
        .bind(order_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.price)
        .bind(line.quantity)
        .fetch_one(&mut *conn)
        .await?;
        items.push(OrderItem::from(row));
    }
    Ok(items)
}

/// Lock and load an order for a lifecycle transition.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Order::from))
}

/// Load an order's items inside an existing transaction (for restocking).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn items_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
        "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1"
    ))
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(OrderItem::from).collect())
}

/// The most recent orders, newest first, inside an existing transaction.
///
/// Used by the stats rollup so the feed shares its read snapshot.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn recent_tx(
    conn: &mut PgConnection,
    limit: i64,
) -> Result<Vec<Order>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Order::from).collect())
}

/// Apply `pending -> paid`, stamping `paid_at`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_paid_tx(conn: &mut PgConnection, order_id: OrderId) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = 'paid', paid_at = now()
         WHERE id = $1
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Order::from(row))
}

/// Apply `paid -> shipped`, stamping `shipped_at` and the tracking number.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_shipped_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
    tracking_no: &str,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = 'shipped', shipped_at = now(), tracking_no = $2
         WHERE id = $1
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .bind(tracking_no)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Order::from(row))
}

/// Apply `shipped -> completed`, stamping `completed_at`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_completed_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = 'completed', completed_at = now()
         WHERE id = $1
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Order::from(row))
}

/// Apply `pending/paid -> cancelled`. No timestamp is stamped; the caller
/// restocks the cancelled quantities in the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn mark_cancelled_tx(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = 'cancelled'
         WHERE id = $1
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Order::from(row))
}
