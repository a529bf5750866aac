//! Service layer: validation, transaction orchestration, and error mapping
//! over the repositories.
//!
//! Role checks stay at the transport boundary; services here trust their
//! caller's identity argument and enforce ownership only.

pub mod addresses;
pub mod carts;
pub mod checkout;
pub mod order_number;
pub mod orders;
pub mod stats;
pub mod users;

pub use addresses::AddressService;
pub use carts::CartService;
pub use checkout::{CheckoutService, ItemSelection};
pub use orders::OrderService;
pub use stats::StatsService;
pub use users::UserAdminService;
