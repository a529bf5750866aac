//! Checkout: freeze a mutable cart into an immutable, priced order.
//!
//! The whole conversion runs in one transaction: lock the selected cart
//! lines, re-validate every product under a row lock, conditionally decrement
//! stock, capture prices and the shipping address into the order, and delete
//! the consumed cart lines. Any failure rolls back all of it; there are no
//! partial orders and no partial stock decrements.

use rust_decimal::Decimal;
use sqlx::PgPool;

use orchard_core::{AddressId, CartItemId, UserId};

use crate::db::orders::{NewOrder, NewOrderLine};
use crate::db::{CartRepository, RepositoryError, addresses, carts, catalog, orders};
use crate::error::{CommerceError, Result};
use crate::models::cart::CartItem;
use crate::models::order::{OrderWithItems, ShippingSnapshot};
use crate::services::order_number;

/// Bounded retries for the vanishingly rare order-number collision.
const MAX_ORDER_NO_ATTEMPTS: u32 = 3;

/// Which cart lines a checkout consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSelection {
    /// Every line currently in the cart.
    All,
    /// Only the named lines; unknown IDs are simply not matched.
    Items(Vec<CartItemId>),
}

/// Checkout operations for a transport layer.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the selected cart lines into a pending order.
    ///
    /// Retries the whole transaction with a fresh order number when the
    /// unique constraint on `order_no` trips.
    ///
    /// # Errors
    ///
    /// - `CommerceError::EmptyCart` when the selection matches no lines
    /// - `CommerceError::AddressNotFound` when the shipping address does not
    ///   belong to the user
    /// - `CommerceError::ProductUnavailable` / `InsufficientStock` from
    ///   in-transaction re-validation
    /// - `CommerceError::Conflict` when order-number retries are exhausted
    pub async fn checkout(
        &self,
        user_id: UserId,
        selection: &ItemSelection,
        shipping_address_id: AddressId,
    ) -> Result<OrderWithItems> {
        let mut last_conflict = None;
        for attempt in 1..=MAX_ORDER_NO_ATTEMPTS {
            match self.checkout_once(user_id, selection, shipping_address_id).await {
                Err(CommerceError::Conflict(msg)) => {
                    tracing::warn!(user_id = %user_id, attempt, "Order number collision, retrying");
                    last_conflict = Some(CommerceError::Conflict(msg));
                }
                other => return other,
            }
        }
        Err(last_conflict
            .unwrap_or_else(|| CommerceError::Conflict("order number collision".to_owned())))
    }

    async fn checkout_once(
        &self,
        user_id: UserId,
        selection: &ItemSelection,
        shipping_address_id: AddressId,
    ) -> Result<OrderWithItems> {
        let cart = CartRepository::new(self.pool).get_or_create(user_id).await?;

        let mut tx = self.pool.begin().await?;

        let item_ids = match selection {
            ItemSelection::All => None,
            ItemSelection::Items(ids) => Some(ids.as_slice()),
        };
        let items = carts::lock_items_tx(&mut tx, cart.id, item_ids).await?;
        if items.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let address = addresses::get_owned_tx(&mut tx, user_id, shipping_address_id)
            .await?
            .ok_or(CommerceError::AddressNotFound)?;

        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let product = catalog::get_for_update_tx(&mut tx, item.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or(CommerceError::ProductUnavailable {
                    product_id: item.product_id,
                })?;

            if product.stock < item.quantity {
                return Err(CommerceError::insufficient_stock(
                    item.product_id,
                    item.quantity,
                    product.stock,
                ));
            }

            // The row is locked above, but the conditional decrement is kept
            // as the authoritative guard against driving stock negative.
            if !catalog::decrement_stock_tx(&mut tx, item.product_id, item.quantity).await? {
                return Err(CommerceError::insufficient_stock(
                    item.product_id,
                    item.quantity,
                    product.stock,
                ));
            }

            lines.push(NewOrderLine {
                product_id: item.product_id,
                product_name: product.name,
                price: product.price,
                quantity: item.quantity,
            });
        }

        let total_amount = order_total(&lines);
        CommerceError::check_amount(total_amount)?;

        let order = orders::insert_order_tx(
            &mut tx,
            &NewOrder {
                user_id,
                order_no: order_number::generate(),
                total_amount,
                shipping: ShippingSnapshot::from(&address),
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => CommerceError::Conflict(msg),
            other => CommerceError::Repository(other),
        })?;
        let order_items = orders::insert_items_tx(&mut tx, order.id, &lines).await?;

        let consumed: Vec<CartItemId> = items.iter().map(|item| item.id).collect();
        carts::delete_items_tx(&mut tx, &consumed).await?;
        carts::touch_tx(&mut tx, cart.id).await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            order_no = %order.order_no,
            total = %order.total_amount,
            lines = order_items.len(),
            "Checkout committed"
        );

        Ok(OrderWithItems {
            order,
            items: order_items,
        })
    }
}

/// Sum of price x quantity over the captured lines.
#[must_use]
pub fn order_total(lines: &[NewOrderLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum()
}

/// Select the cart items a checkout should consume from an already-loaded
/// cart listing. Matching happens in SQL; this mirrors it for callers that
/// want to preview a selection.
#[must_use]
pub fn select_items<'i>(items: &'i [CartItem], selection: &ItemSelection) -> Vec<&'i CartItem> {
    match selection {
        ItemSelection::All => items.iter().collect(),
        ItemSelection::Items(ids) => items.iter().filter(|item| ids.contains(&item.id)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orchard_core::{CartId, ProductId};

    fn line(cents: i64, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            product_id: ProductId::generate(),
            product_name: "Keemun".to_owned(),
            price: Decimal::new(cents, 2),
            quantity,
        }
    }

    #[test]
    fn test_order_total_sums_lines() {
        // 2 x 10.00 totals 20.00.
        assert_eq!(order_total(&[line(1000, 2)]), Decimal::new(2000, 2));

        let lines = [line(1000, 2), line(550, 4), line(99, 1)];
        assert_eq!(order_total(&lines), Decimal::new(4299, 2));
    }

    #[test]
    fn test_order_total_of_nothing_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    fn cart_item() -> CartItem {
        CartItem {
            id: orchard_core::CartItemId::generate(),
            cart_id: CartId::generate(),
            product_id: ProductId::generate(),
            quantity: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_items_all_and_subset() {
        let items = vec![cart_item(), cart_item(), cart_item()];

        let all = select_items(&items, &ItemSelection::All);
        assert_eq!(all.len(), 3);

        let picked = ItemSelection::Items(vec![items[1].id]);
        let subset = select_items(&items, &picked);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, items[1].id);

        // Unknown IDs match nothing rather than failing.
        let unknown = ItemSelection::Items(vec![orchard_core::CartItemId::generate()]);
        assert!(select_items(&items, &unknown).is_empty());
    }
}
