//! Order domain models.
//!
//! An order is an immutable priced snapshot of a cart at checkout time. Line
//! prices and the shipping address are captured once and never resynchronized
//! with the catalog or the address book.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use crate::models::address::Address;

/// Shipping fields copied from an [`Address`] at checkout.
///
/// Holds values, not a reference: editing or deleting the source address
/// later never alters a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSnapshot {
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Province.
    pub province: String,
    /// City.
    pub city: String,
    /// District.
    pub district: String,
    /// Street-level detail.
    pub detail: String,
}

impl From<&Address> for ShippingSnapshot {
    fn from(address: &Address) -> Self {
        Self {
            name: address.recipient_name.clone(),
            phone: address.phone.clone(),
            province: address.province.clone(),
            city: address.city.clone(),
            district: address.district.clone(),
            detail: address.detail.clone(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Human-readable unique order number.
    pub order_no: String,
    /// Total captured at checkout, 2 decimal places.
    pub total_amount: Decimal,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Shipping address snapshot.
    pub shipping: ShippingSnapshot,
    /// Carrier tracking number, set when shipped.
    pub tracking_no: Option<String>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Set by the `pending -> paid` transition.
    pub paid_at: Option<DateTime<Utc>>,
    /// Set by the `paid -> shipped` transition.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Set by the `shipped -> completed` transition.
    pub completed_at: Option<DateTime<Utc>>,
}

/// A line item frozen into an order at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Weak product reference; `None` once the product is deleted. The
    /// captured name and price below survive regardless.
    pub product_id: Option<ProductId>,
    /// Product name at checkout time.
    pub product_name: String,
    /// Unit price at checkout time.
    pub price: Decimal,
    /// Units purchased.
    pub quantity: i32,
}

impl OrderItem {
    /// Line subtotal from the frozen snapshot, never from live catalog data.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    /// The order itself.
    pub order: Order,
    /// Its frozen line items.
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ProductSnapshot;
    use orchard_core::AddressId;

    fn address() -> Address {
        Address {
            id: AddressId::generate(),
            user_id: UserId::generate(),
            recipient_name: "Wen Li".to_owned(),
            phone: "13800000000".to_owned(),
            province: "Zhejiang".to_owned(),
            city: "Hangzhou".to_owned(),
            district: "Xihu".to_owned(),
            detail: "18 Longjing Rd".to_owned(),
            is_default: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_shipping_snapshot_copies_fields() {
        let addr = address();
        let snapshot = ShippingSnapshot::from(&addr);
        assert_eq!(snapshot.name, addr.recipient_name);
        assert_eq!(snapshot.phone, addr.phone);
        assert_eq!(snapshot.detail, addr.detail);
    }

    #[test]
    fn test_snapshot_survives_address_edits() {
        let mut addr = address();
        let snapshot = ShippingSnapshot::from(&addr);
        addr.recipient_name = "Someone Else".to_owned();
        addr.detail = "1 New St".to_owned();
        assert_eq!(snapshot.name, "Wen Li");
        assert_eq!(snapshot.detail, "18 Longjing Rd");
    }

    #[test]
    fn test_order_item_subtotal_is_frozen() {
        let product_id = ProductId::generate();
        let mut product = ProductSnapshot {
            id: product_id,
            name: "Silver Needle".to_owned(),
            price: Decimal::new(1000, 2),
            stock: 10,
            is_active: true,
        };

        // Captured at checkout.
        let item = OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id: Some(product_id),
            product_name: product.name.clone(),
            price: product.price,
            quantity: 2,
        };
        assert_eq!(item.subtotal(), Decimal::new(2000, 2));

        // Later price changes must not affect the frozen line.
        product.price = Decimal::new(9999, 2);
        assert_eq!(item.price, Decimal::new(1000, 2));
        assert_eq!(item.subtotal(), Decimal::new(2000, 2));
    }

    #[test]
    fn test_order_item_outlives_product_link() {
        let item = OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id: None,
            product_name: "Discontinued Blend".to_owned(),
            price: Decimal::new(550, 2),
            quantity: 4,
        };
        assert_eq!(item.subtotal(), Decimal::new(2200, 2));
    }
}
