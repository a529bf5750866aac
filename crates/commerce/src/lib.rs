//! Orchard Commerce - back-office commerce core.
//!
//! The library converts a user's mutable cart into an immutable, priced
//! order snapshot and then owns the order's lifecycle:
//!
//! - [`services::AddressService`] - address book with the single-default
//!   invariant
//! - [`services::CartService`] - one mutable cart per user, live-priced
//! - [`services::CheckoutService`] - the cart-to-order freeze, atomic with
//!   stock decrements
//! - [`services::OrderService`] - the `pending -> paid -> shipped ->
//!   completed` state machine, cancellation with restock
//! - [`services::StatsService`] - consistent dashboard rollups
//! - [`services::UserAdminService`] - ban/unban for the admin surface
//!
//! Transport, authentication, and role checks live outside this crate;
//! callers hand every operation an already-authenticated [`orchard_core::UserId`].
//!
//! # Example
//!
//! ```rust,no_run
//! use orchard_commerce::config::CommerceConfig;
//! use orchard_commerce::db::create_pool;
//! use orchard_commerce::services::{CheckoutService, ItemSelection};
//! # use orchard_core::{AddressId, UserId};
//!
//! # async fn run(user_id: UserId, address_id: AddressId) -> Result<(), Box<dyn std::error::Error>> {
//! let config = CommerceConfig::from_env()?;
//! let pool = create_pool(&config.database_url, config.max_connections).await?;
//!
//! let placed = CheckoutService::new(&pool)
//!     .checkout(user_id, &ItemSelection::All, address_id)
//!     .await?;
//! println!("order {} total {}", placed.order.order_no, placed.order.total_amount);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::{CommerceError, Result};
