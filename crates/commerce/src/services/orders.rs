//! Order lifecycle service.
//!
//! Owns every status change after checkout. Transitions run with the order
//! row locked; cancellation restocks the order's quantities in the same
//! transaction.

use sqlx::{PgConnection, PgPool};

use orchard_core::{OrderAction, OrderId, OrderStatus, ProductId, UserId};

use crate::db::{OrderRepository, catalog, orders};
use crate::error::{CommerceError, Result};
use crate::models::order::{Order, OrderItem, OrderWithItems};

/// Outcome of planning a transition before touching the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// The order is already in the requested state; succeed without writing
    /// anything (no duplicate timestamps, no double restock).
    AlreadyThere,
    /// Apply the transition.
    Apply,
}

/// Decide whether a requested transition may run.
///
/// Retrying the same action against an order already in the target state is
/// an idempotent success; every other non-adjacent pair is rejected.
///
/// # Errors
///
/// Returns `CommerceError::InvalidTransition` for illegal pairs.
pub fn plan_transition(current: OrderStatus, target: OrderStatus) -> Result<TransitionPlan> {
    if current == target {
        return Ok(TransitionPlan::AlreadyThere);
    }
    if current.can_transition_to(target) {
        return Ok(TransitionPlan::Apply);
    }
    Err(CommerceError::InvalidTransition {
        from: current,
        to: target,
    })
}

/// The (product, quantity) pairs a cancellation must return to stock.
///
/// Lines whose product has since been deleted carry no live row to restock
/// and are skipped.
#[must_use]
pub fn restock_quantities(items: &[OrderItem]) -> Vec<(ProductId, i32)> {
    items
        .iter()
        .filter_map(|item| item.product_id.map(|id| (id, item.quantity)))
        .collect()
}

/// Order lifecycle operations for transport and admin layers.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order does not exist.
    pub async fn get(&self, order_id: OrderId) -> Result<OrderWithItems> {
        self.orders
            .get(order_id)
            .await?
            .ok_or(CommerceError::NotFound("order"))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Repository` on database failure.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// User-facing cancellation; the order must belong to the caller.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` for missing or foreign orders,
    /// `CommerceError::InvalidTransition` once the order has shipped.
    pub async fn cancel(&self, user_id: UserId, order_id: OrderId) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let order = orders::lock_tx(&mut tx, order_id)
            .await?
            .filter(|order| order.user_id == user_id)
            .ok_or(CommerceError::NotFound("order"))?;

        let order = match plan_transition(order.status, OrderStatus::Cancelled)? {
            TransitionPlan::AlreadyThere => order,
            TransitionPlan::Apply => apply_cancel_tx(&mut tx, &order).await?,
        };

        tx.commit().await?;
        Ok(order)
    }

    /// Admin-driven lifecycle transition. Role enforcement happens at the
    /// transport boundary.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` for a blank tracking number,
    /// `CommerceError::NotFound` for missing orders, and
    /// `CommerceError::InvalidTransition` for illegal pairs.
    pub async fn transition(&self, order_id: OrderId, action: &OrderAction) -> Result<Order> {
        if let OrderAction::Ship { tracking_no } = action
            && tracking_no.trim().is_empty()
        {
            return Err(CommerceError::Validation(
                "tracking number must not be blank".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let order = orders::lock_tx(&mut tx, order_id)
            .await?
            .ok_or(CommerceError::NotFound("order"))?;

        let target = action.target();
        let order = match plan_transition(order.status, target)? {
            TransitionPlan::AlreadyThere => {
                tracing::info!(order_no = %order.order_no, status = %target, "Transition retry ignored");
                order
            }
            TransitionPlan::Apply => {
                let updated = match action {
                    OrderAction::MarkPaid => orders::mark_paid_tx(&mut tx, order_id).await?,
                    OrderAction::Ship { tracking_no } => {
                        orders::mark_shipped_tx(&mut tx, order_id, tracking_no.trim()).await?
                    }
                    OrderAction::Complete => orders::mark_completed_tx(&mut tx, order_id).await?,
                    OrderAction::Cancel => apply_cancel_tx(&mut tx, &order).await?,
                };
                tracing::info!(
                    order_no = %updated.order_no,
                    from = %order.status,
                    to = %updated.status,
                    "Order transition applied"
                );
                updated
            }
        };

        tx.commit().await?;
        Ok(order)
    }
}

/// Mark the order cancelled and return its quantities to stock, all inside
/// the caller's transaction. Stock was decremented at checkout, so both
/// `pending` and `paid` cancellations restock.
async fn apply_cancel_tx(tx: &mut PgConnection, order: &Order) -> Result<Order> {
    let items = orders::items_tx(&mut *tx, order.id).await?;
    for (product_id, quantity) in restock_quantities(&items) {
        catalog::restock_tx(&mut *tx, product_id, quantity).await?;
    }
    let cancelled = orders::mark_cancelled_tx(&mut *tx, order.id).await?;
    tracing::info!(order_no = %cancelled.order_no, lines = items.len(), "Order cancelled, stock returned");
    Ok(cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::OrderItemId;
    use rust_decimal::Decimal;

    #[test]
    fn test_plan_allows_forward_chain() {
        assert_eq!(
            plan_transition(OrderStatus::Pending, OrderStatus::Paid).expect("legal"),
            TransitionPlan::Apply
        );
        assert_eq!(
            plan_transition(OrderStatus::Paid, OrderStatus::Shipped).expect("legal"),
            TransitionPlan::Apply
        );
        assert_eq!(
            plan_transition(OrderStatus::Shipped, OrderStatus::Completed).expect("legal"),
            TransitionPlan::Apply
        );
    }

    #[test]
    fn test_plan_is_idempotent_on_same_state() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(
                plan_transition(status, status).expect("retry is a success"),
                TransitionPlan::AlreadyThere
            );
        }
    }

    #[test]
    fn test_plan_rejects_non_adjacent_pairs() {
        assert!(matches!(
            plan_transition(OrderStatus::Shipped, OrderStatus::Pending),
            Err(CommerceError::InvalidTransition { .. })
        ));
        assert!(matches!(
            plan_transition(OrderStatus::Pending, OrderStatus::Completed),
            Err(CommerceError::InvalidTransition { .. })
        ));
        assert!(matches!(
            plan_transition(OrderStatus::Shipped, OrderStatus::Cancelled),
            Err(CommerceError::InvalidTransition { .. })
        ));
        assert!(matches!(
            plan_transition(OrderStatus::Cancelled, OrderStatus::Paid),
            Err(CommerceError::InvalidTransition { .. })
        ));
    }

    fn item(product_id: Option<ProductId>, quantity: i32) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id,
            product_name: "Gunpowder".to_owned(),
            price: Decimal::new(425, 2),
            quantity,
        }
    }

    #[test]
    fn test_restock_quantities_match_order_lines() {
        let first = ProductId::generate();
        let second = ProductId::generate();
        let items = [item(Some(first), 2), item(Some(second), 5)];

        let restock = restock_quantities(&items);
        assert_eq!(restock, vec![(first, 2), (second, 5)]);
    }

    #[test]
    fn test_restock_skips_deleted_products() {
        let live = ProductId::generate();
        let items = [item(None, 3), item(Some(live), 1)];

        let restock = restock_quantities(&items);
        assert_eq!(restock, vec![(live, 1)]);
    }
}
