//! Checkout pricing and selection rules.

use chrono::Utc;
use rust_decimal::Decimal;

use orchard_commerce::db::orders::NewOrderLine;
use orchard_commerce::models::{CartItem, ProductSnapshot};
use orchard_commerce::services::checkout::{ItemSelection, order_total, select_items};
use orchard_commerce::services::order_number;
use orchard_core::{CartId, CartItemId, ProductId};

fn line(cents: i64, quantity: i32) -> NewOrderLine {
    NewOrderLine {
        product_id: ProductId::generate(),
        product_name: "Tieguanyin".to_owned(),
        price: Decimal::new(cents, 2),
        quantity,
    }
}

#[test]
fn test_two_units_at_ten_total_twenty() {
    // Cart [{qty=2, price=10.00}] totals exactly 20.00.
    let total = order_total(&[line(1000, 2)]);
    assert_eq!(total, Decimal::new(2000, 2));
    assert_eq!(total.to_string(), "20.00");
}

#[test]
fn test_totals_keep_two_decimal_places() {
    let total = order_total(&[line(333, 3), line(1, 1)]);
    assert_eq!(total, Decimal::new(1000, 2));
    assert_eq!(total.scale(), 2);
}

#[test]
fn test_total_is_line_order_independent() {
    let a = line(999, 2);
    let b = line(1250, 3);
    let forward = order_total(&[a.clone(), b.clone()]);
    let backward = order_total(&[b, a]);
    assert_eq!(forward, backward);
}

#[test]
fn test_availability_flags_track_stock_and_active() {
    let product = ProductSnapshot {
        id: ProductId::generate(),
        name: "Yellow Mountain Fur Peak".to_owned(),
        price: Decimal::new(2200, 2),
        stock: 3,
        is_active: true,
    };
    assert!(product.can_fulfill(3));
    assert!(!product.can_fulfill(4));

    let inactive = ProductSnapshot {
        is_active: false,
        ..product
    };
    assert!(!inactive.can_fulfill(1));
}

mod selection {
    use super::*;

    fn item() -> CartItem {
        CartItem {
            id: CartItemId::generate(),
            cart_id: CartId::generate(),
            product_id: ProductId::generate(),
            quantity: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_takes_every_line() {
        let items = vec![item(), item()];
        assert_eq!(select_items(&items, &ItemSelection::All).len(), 2);
    }

    #[test]
    fn test_named_selection_ignores_foreign_ids() {
        let items = vec![item(), item()];
        let first = items.first().expect("two items").id;
        let selection = ItemSelection::Items(vec![first, CartItemId::generate()]);

        let picked = select_items(&items, &selection);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.first().expect("one match").id, first);
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let items = vec![item()];
        assert!(select_items(&items, &ItemSelection::Items(Vec::new())).is_empty());
    }
}

mod order_numbers {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_numbers_are_unique_in_bulk() {
        let numbers: HashSet<String> = (0..5000).map(|_| order_number::generate()).collect();
        assert_eq!(numbers.len(), 5000);
    }

    #[test]
    fn test_number_starts_with_current_epoch_seconds() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock after epoch")
            .as_secs();
        let number = order_number::generate();
        let (ts, _) = number.split_at(10);
        let stamped: u64 = ts.parse().expect("timestamp prefix");
        assert!(stamped >= before && stamped <= before + 2);
    }
}
