//! Cart Models

use mavuno::{cart::CartLineItem, money::Amount, products::ProductId};

/// Add-to-cart request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    /// Product to add
    pub product_id: ProductId,

    /// Units to add, at least one
    pub quantity: u32,
}

/// Backend answer to an add-to-cart request
#[derive(Debug, Clone, PartialEq)]
pub struct AddedCartItem {
    /// Backend message, if any
    pub message: Option<String>,

    /// The line as stored by the backend, when it sends one back
    pub item: Option<CartLineItem>,

    /// Authoritative grand total, when sent
    pub total: Option<Amount>,
}

/// Backend answer to an update, removal or clear
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartAck {
    /// Backend message, if any
    pub message: Option<String>,

    /// Authoritative grand total, when sent
    pub total: Option<Amount>,
}
