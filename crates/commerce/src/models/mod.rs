//! Domain models for the commerce core.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod stats;
pub mod user;

pub use address::{Address, NewAddress, UpdateAddress};
pub use cart::{Cart, CartItem, CartLine};
pub use catalog::ProductSnapshot;
pub use order::{Order, OrderItem, OrderWithItems, ShippingSnapshot};
pub use stats::{OrderStatusCounts, StatsSummary, UserCounts};
pub use user::User;
