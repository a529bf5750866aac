//! Integration tests for Orchard.
//!
//! # Test Categories
//!
//! - `order_lifecycle` - State machine laws: legal chain, idempotent
//!   retries, terminal states, restock accounting
//! - `checkout_rules` - Pricing arithmetic, item selection, order-number
//!   properties
//! - `snapshots` - Immutability of captured prices and shipping addresses
//!
//! Database-backed race properties (oversell, concurrent `set_default`,
//! concurrent checkout of one cart) are guaranteed by the transaction and
//! locking design in `orchard-commerce`; the tests here cover everything
//! decidable without a live `PostgreSQL`.
