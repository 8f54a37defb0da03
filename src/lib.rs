//! Mavuno
//!
//! Storefront core for a farm-produce shop: the shopper's cart with
//! optimistic, two-phase quantity changes, the order fulfilment state
//! machine, and the formatting used to show both.
//!
//! This crate does no I/O. The `mavuno-app` crate talks to the backend and
//! drives these types.

pub mod cart;
pub mod display;
pub mod ids;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod products;
