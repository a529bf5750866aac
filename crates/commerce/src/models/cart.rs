//! Cart domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{CartId, CartItemId, ProductId, UserId};

/// A user's cart. Exactly one per user, created lazily on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// Bumped on every item mutation.
    pub updated_at: DateTime<Utc>,
}

/// A (cart, product) line with a positive quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique item ID.
    pub id: CartItemId,
    /// Cart this line belongs to.
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units in the cart, always >= 1.
    pub quantity: i32,
    /// When the line was first added.
    pub created_at: DateTime<Utc>,
}

/// A cart line joined against the live catalog.
///
/// The subtotal is derived from the current product price, never stored;
/// `unavailable` flags lines whose product went inactive or short on stock
/// since they were added. Checkout re-validates regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// The underlying cart item.
    pub item: CartItem,
    /// Current product name.
    pub product_name: String,
    /// Current unit price from the catalog.
    pub unit_price: Decimal,
    /// Current stock level.
    pub product_stock: i32,
    /// Whether the product is still purchasable.
    pub product_active: bool,
}

impl CartLine {
    /// Line subtotal at the current catalog price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.item.quantity)
    }

    /// Whether this line would fail checkout re-validation right now.
    #[must_use]
    pub const fn unavailable(&self) -> bool {
        !self.product_active || self.product_stock < self.item.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: Decimal, stock: i32, active: bool) -> CartLine {
        CartLine {
            item: CartItem {
                id: CartItemId::generate(),
                cart_id: CartId::generate(),
                product_id: ProductId::generate(),
                quantity,
                created_at: Utc::now(),
            },
            product_name: "Jasmine Pearls".to_owned(),
            unit_price,
            product_stock: stock,
            product_active: active,
        }
    }

    #[test]
    fn test_subtotal_uses_current_price() {
        let line = line(3, Decimal::new(1250, 2), 10, true);
        assert_eq!(line.subtotal(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_unavailable_when_inactive_or_short() {
        assert!(!line(2, Decimal::ONE, 2, true).unavailable());
        assert!(line(2, Decimal::ONE, 1, true).unavailable());
        assert!(line(1, Decimal::ONE, 10, false).unavailable());
    }
}
