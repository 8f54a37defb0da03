//! Cart
//!
//! The session's view of the shopping cart. The backend is the source of
//! truth; this module only holds what the backend last confirmed plus any
//! quantity change that is waiting on a response.

use thiserror::Error;

use crate::{money::AmountError, products::ProductId};

mod line_item;
mod snapshot;
mod staged;

pub use line_item::{CartItemId, CartLineItem};
pub use snapshot::CartSnapshot;
pub use staged::StagedQuantity;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// The line item is not in the cart.
    #[error("cart line item {0} not found")]
    UnknownLineItem(CartItemId),

    /// The product has no stock left.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The product has fewer units than requested.
    #[error("requested {requested} of product {product} but only {available} in stock")]
    InsufficientStock {
        /// Product being added
        product: ProductId,

        /// Requested units
        requested: u32,

        /// Units in stock
        available: u32,
    },

    /// The line item no longer holds the staged quantity, so the change can
    /// neither be committed nor rolled back.
    #[error("staged change for line item {0} no longer matches the cart")]
    StaleStage(CartItemId),

    /// Amount conversion or arithmetic failed.
    #[error(transparent)]
    Amount(#[from] AmountError),
}
