//! Catalog gateway models.
//!
//! Product storage is owned by the catalog service; the core only ever sees
//! this point-in-time view of a product row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::ProductId;

/// A point-in-time view of a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID.
    pub id: ProductId,
    /// Display name, captured into order items at checkout.
    pub name: String,
    /// Current unit price.
    pub price: Decimal,
    /// Units in stock.
    pub stock: i32,
    /// Whether the product is purchasable at all.
    pub is_active: bool,
}

impl ProductSnapshot {
    /// Whether `quantity` units could be purchased from this snapshot.
    ///
    /// Checkout re-validates inside its transaction; this is for flagging
    /// stale cart lines to the caller.
    #[must_use]
    pub const fn can_fulfill(&self, quantity: i32) -> bool {
        self.is_active && self.stock >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(stock: i32, is_active: bool) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::generate(),
            name: "Oolong Sampler".to_owned(),
            price: Decimal::new(1000, 2),
            stock,
            is_active,
        }
    }

    #[test]
    fn test_can_fulfill_requires_active_and_stock() {
        assert!(snapshot(5, true).can_fulfill(5));
        assert!(!snapshot(4, true).can_fulfill(5));
        assert!(!snapshot(5, false).can_fulfill(1));
        assert!(snapshot(0, true).can_fulfill(0));
    }
}
