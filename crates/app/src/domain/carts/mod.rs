//! Carts

mod confirm;
pub mod errors;
mod manager;
pub mod models;
pub mod records;
pub mod service;

pub use confirm::{AlreadyConfirmed, Confirm, MockConfirm};
pub use errors::CartsServiceError;
pub use manager::CartManager;
pub use service::*;
