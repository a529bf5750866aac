//! Lifecycle state machine laws, exercised through the public API.

use orchard_core::{OrderAction, OrderStatus};
use orchard_commerce::CommerceError;
use orchard_commerce::services::orders::{TransitionPlan, plan_transition, restock_quantities};

const ALL_STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Paid,
    OrderStatus::Shipped,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

/// The full legal transition set, nothing more.
const LEGAL: [(OrderStatus, OrderStatus); 5] = [
    (OrderStatus::Pending, OrderStatus::Paid),
    (OrderStatus::Paid, OrderStatus::Shipped),
    (OrderStatus::Shipped, OrderStatus::Completed),
    (OrderStatus::Pending, OrderStatus::Cancelled),
    (OrderStatus::Paid, OrderStatus::Cancelled),
];

#[test]
fn test_exact_transition_matrix() {
    for from in ALL_STATUSES {
        for to in ALL_STATUSES {
            let expected = LEGAL.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "transition {from} -> {to}"
            );
        }
    }
}

#[test]
fn test_plan_matches_matrix() {
    for from in ALL_STATUSES {
        for to in ALL_STATUSES {
            let plan = plan_transition(from, to);
            if from == to {
                assert_eq!(plan.expect("retry"), TransitionPlan::AlreadyThere);
            } else if LEGAL.contains(&(from, to)) {
                assert_eq!(plan.expect("legal"), TransitionPlan::Apply);
            } else {
                let err = plan.expect_err("illegal");
                match err {
                    CommerceError::InvalidTransition { from: f, to: t } => {
                        assert_eq!((f, t), (from, to));
                    }
                    other => panic!("expected InvalidTransition, got {other}"),
                }
            }
        }
    }
}

#[test]
fn test_retrying_a_transition_is_a_noop_success() {
    // Marking a paid order paid again must not fail and must not apply.
    assert_eq!(
        plan_transition(OrderStatus::Paid, OrderAction::MarkPaid.target()).expect("retry"),
        TransitionPlan::AlreadyThere
    );
    // But moving backwards from shipped is an error, not a retry.
    assert!(plan_transition(OrderStatus::Shipped, OrderStatus::Pending).is_err());
}

#[test]
fn test_actions_cover_every_non_initial_status() {
    let targets = [
        OrderAction::MarkPaid.target(),
        OrderAction::Ship {
            tracking_no: "SF1234567890".to_owned(),
        }
        .target(),
        OrderAction::Complete.target(),
        OrderAction::Cancel.target(),
    ];
    assert_eq!(
        targets,
        [
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled
        ]
    );
}

mod restock {
    use super::*;
    use orchard_commerce::models::OrderItem;
    use orchard_core::{OrderId, OrderItemId, ProductId};
    use rust_decimal::Decimal;

    fn item(product_id: Option<ProductId>, quantity: i32, cents: i64) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id,
            product_name: "Oolong".to_owned(),
            price: Decimal::new(cents, 2),
            quantity,
        }
    }

    #[test]
    fn test_cancel_restocks_exactly_the_ordered_quantities() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        let items = [item(Some(a), 2, 1000), item(Some(b), 7, 50)];

        let restock = restock_quantities(&items);
        let total: i32 = restock.iter().map(|(_, qty)| qty).sum();
        assert_eq!(restock.len(), 2);
        assert_eq!(total, 9);
        assert!(restock.contains(&(a, 2)));
        assert!(restock.contains(&(b, 7)));
    }

    #[test]
    fn test_deleted_products_are_not_restocked() {
        let items = [item(None, 4, 1000)];
        assert!(restock_quantities(&items).is_empty());
    }
}
