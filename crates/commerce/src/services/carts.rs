//! Cart service.

use sqlx::PgPool;

use orchard_core::{CartItemId, ProductId, UserId};

use crate::db::{CartRepository, RepositoryError, catalog};
use crate::error::{CommerceError, Result};
use crate::models::cart::{Cart, CartItem, CartLine};

/// Cart operations for a transport layer.
pub struct CartService<'a> {
    pool: &'a PgPool,
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            carts: CartRepository::new(pool),
        }
    }

    /// Fetch the user's cart, creating it lazily.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Repository` on database failure.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart> {
        Ok(self.carts.get_or_create(user_id).await?)
    }

    /// Add a product to the cart, incrementing the quantity when the line
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` when `quantity < 1`,
    /// `CommerceError::ProductUnavailable` when the product is missing or
    /// inactive.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem> {
        CommerceError::check_quantity(quantity)?;

        // Inactive or deleted products cannot be added; stock is only
        // enforced at checkout, where it is re-validated under lock anyway.
        let product = catalog::get(self.pool, product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(CommerceError::ProductUnavailable { product_id })?;

        let cart = self.carts.get_or_create(user_id).await?;
        let item = self
            .carts
            .add_or_increment(cart.id, product_id, quantity)
            .await?;
        tracing::info!(user_id = %user_id, product = %product.name, quantity, "Cart line added");
        Ok(item)
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` when `quantity < 1` (use
    /// [`Self::remove`] instead of zero), `CommerceError::NotFound` when the
    /// item is not in the user's cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem> {
        CommerceError::check_quantity(quantity)?;
        self.carts
            .set_quantity(user_id, item_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CommerceError::NotFound("cart item"),
                other => CommerceError::Repository(other),
            })
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the item is not in the user's
    /// cart.
    pub async fn remove(&self, user_id: UserId, item_id: CartItemId) -> Result<()> {
        self.carts.remove(user_id, item_id).await.map_err(|e| match e {
            RepositoryError::NotFound => CommerceError::NotFound("cart item"),
            other => CommerceError::Repository(other),
        })
    }

    /// List the cart with live-priced subtotals and availability flags.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Repository` on database failure.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        Ok(self.carts.list_lines(user_id).await?)
    }
}
