//! Snapshot semantics: what an order captures at checkout stays captured.

use chrono::Utc;
use rust_decimal::Decimal;

use orchard_commerce::models::{
    Address, CartItem, CartLine, Order, OrderItem, ShippingSnapshot,
};
use orchard_core::{
    AddressId, CartId, CartItemId, OrderId, OrderItemId, OrderStatus, ProductId, UserId,
};

fn address(user_id: UserId) -> Address {
    Address {
        id: AddressId::generate(),
        user_id,
        recipient_name: "Mei Chen".to_owned(),
        phone: "13900000000".to_owned(),
        province: "Fujian".to_owned(),
        city: "Xiamen".to_owned(),
        district: "Siming".to_owned(),
        detail: "7 Gulang Rd".to_owned(),
        is_default: true,
        created_at: Utc::now(),
    }
}

fn placed_order(user_id: UserId, shipping: ShippingSnapshot) -> Order {
    Order {
        id: OrderId::generate(),
        user_id,
        order_no: "175640000012ab34cd".to_owned(),
        total_amount: Decimal::new(2000, 2),
        status: OrderStatus::Pending,
        shipping,
        tracking_no: None,
        created_at: Utc::now(),
        paid_at: None,
        shipped_at: None,
        completed_at: None,
    }
}

#[test]
fn test_order_shipping_survives_address_mutation() {
    let user_id = UserId::generate();
    let mut addr = address(user_id);
    let order = placed_order(user_id, ShippingSnapshot::from(&addr));

    addr.recipient_name = "New Tenant".to_owned();
    addr.city = "Shanghai".to_owned();
    addr.detail = "99 Moved Ave".to_owned();

    assert_eq!(order.shipping.name, "Mei Chen");
    assert_eq!(order.shipping.city, "Xiamen");
    assert_eq!(order.shipping.detail, "7 Gulang Rd");
}

#[test]
fn test_order_shipping_survives_address_deletion() {
    let user_id = UserId::generate();
    let addr = address(user_id);
    let snapshot = ShippingSnapshot::from(&addr);
    drop(addr);

    let order = placed_order(user_id, snapshot);
    assert_eq!(order.shipping.phone, "13900000000");
    assert_eq!(order.shipping.province, "Fujian");
}

#[test]
fn test_frozen_line_price_diverges_from_live_cart_price() {
    let product_id = ProductId::generate();
    let checkout_price = Decimal::new(1500, 2);

    let frozen = OrderItem {
        id: OrderItemId::generate(),
        order_id: OrderId::generate(),
        product_id: Some(product_id),
        product_name: "Da Hong Pao".to_owned(),
        price: checkout_price,
        quantity: 2,
    };

    // The same product back in a cart reflects a later repricing.
    let live = CartLine {
        item: CartItem {
            id: CartItemId::generate(),
            cart_id: CartId::generate(),
            product_id,
            quantity: 2,
            created_at: Utc::now(),
        },
        product_name: "Da Hong Pao".to_owned(),
        unit_price: Decimal::new(2500, 2),
        product_stock: 5,
        product_active: true,
    };

    assert_eq!(frozen.subtotal(), Decimal::new(3000, 2));
    assert_eq!(live.subtotal(), Decimal::new(5000, 2));
    assert_ne!(frozen.subtotal(), live.subtotal());
}

#[test]
fn test_order_serializes_with_nested_shipping_and_lowercase_status() {
    let user_id = UserId::generate();
    let order = placed_order(user_id, ShippingSnapshot::from(&address(user_id)));

    let json = serde_json::to_value(&order).expect("serialize order");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["shipping"]["name"], "Mei Chen");
    assert_eq!(json["shipping"]["district"], "Siming");
    assert_eq!(json["total_amount"], "20.00");
}
