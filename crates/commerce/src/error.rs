//! Unified domain error type for the commerce core.
//!
//! All service operations return `Result<T, CommerceError>`. Validation and
//! not-found errors are detected before any mutation and carry no side
//! effects; mid-transaction failures roll the whole transaction back, so
//! callers never observe partially-applied state.

use rust_decimal::Decimal;
use thiserror::Error;

use orchard_core::{OrderStatus, ProductId};

use crate::db::RepositoryError;

/// Domain-level error for commerce operations.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Malformed input (e.g., quantity below 1, empty tracking number).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Checkout was attempted with no cart items selected.
    #[error("cart is empty")]
    EmptyCart,

    /// The product is inactive or has been removed from the catalog.
    #[error("product {product_id} is unavailable")]
    ProductUnavailable {
        /// The unavailable product.
        product_id: ProductId,
    },

    /// Not enough stock to satisfy the requested quantity.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The product that ran short.
        product_id: ProductId,
        /// Quantity the caller asked for.
        requested: i32,
        /// Stock observed inside the checkout transaction.
        available: i32,
    },

    /// The shipping address does not exist or belongs to another user.
    #[error("address not found")]
    AddressNotFound,

    /// The requested status change is not a legal lifecycle transition.
    #[error("invalid order transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the order is currently in.
        from: OrderStatus,
        /// Status the caller asked for.
        to: OrderStatus,
    },

    /// A uniqueness conflict that survived internal retries.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CommerceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::from(err))
    }
}

/// Result type alias for commerce operations.
pub type Result<T> = std::result::Result<T, CommerceError>;

impl CommerceError {
    /// Build an `InsufficientStock` error from an observed stock level.
    #[must_use]
    pub const fn insufficient_stock(product_id: ProductId, requested: i32, available: i32) -> Self {
        Self::InsufficientStock {
            product_id,
            requested,
            available,
        }
    }

    /// Validate a cart/order line quantity.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when `quantity` is below 1.
    pub fn check_quantity(quantity: i32) -> Result<()> {
        if quantity >= 1 {
            Ok(())
        } else {
            Err(Self::Validation(format!(
                "quantity must be at least 1, got {quantity}"
            )))
        }
    }

    /// Validate a monetary amount before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for negative amounts.
    pub fn check_amount(amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() {
            Err(Self::Validation(format!("amount must not be negative, got {amount}")))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_quantity_bounds() {
        assert!(CommerceError::check_quantity(1).is_ok());
        assert!(CommerceError::check_quantity(99).is_ok());
        assert!(matches!(
            CommerceError::check_quantity(0),
            Err(CommerceError::Validation(_))
        ));
        assert!(matches!(
            CommerceError::check_quantity(-3),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_transition_error_names_both_states() {
        let err = CommerceError::InvalidTransition {
            from: OrderStatus::Shipped,
            to: OrderStatus::Pending,
        };
        let msg = err.to_string();
        assert!(msg.contains("shipped"));
        assert!(msg.contains("pending"));
    }

    #[test]
    fn test_check_amount_rejects_negative() {
        assert!(CommerceError::check_amount(Decimal::new(1999, 2)).is_ok());
        assert!(CommerceError::check_amount(Decimal::ZERO).is_ok());
        assert!(matches!(
            CommerceError::check_amount(Decimal::new(-1, 2)),
            Err(CommerceError::Validation(_))
        ));
    }
}
