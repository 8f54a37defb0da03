//! Orders

mod console;
pub mod errors;
pub mod models;
pub mod records;
pub mod service;

pub use console::OrderConsole;
pub use errors::OrdersServiceError;
pub use service::*;
