//! Products

use crate::{cart::CartError, ids::TypedId, money::Amount};

/// Product Id
pub type ProductId = TypedId<Product>;

/// A farm product as listed in the storefront catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Backend id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price per unit
    pub unit_price: Amount,

    /// Units currently in stock
    pub stock: u32,

    /// Selling unit, e.g. "kg" or "tray"
    pub unit: Option<String>,
}

impl Product {
    /// Whether the product can be added to a cart at all.
    pub fn is_purchasable(&self) -> bool {
        self.stock > 0
    }

    /// Check a prospective add-to-cart against the listed stock.
    ///
    /// The backend has the final say; this only stops requests that are
    /// certain to be refused.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::OutOfStock`]: nothing left to sell.
    /// - [`CartError::InsufficientStock`]: fewer units than requested.
    pub fn ensure_purchasable(&self, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        if !self.is_purchasable() {
            return Err(CartError::OutOfStock(self.id));
        }

        if quantity > self.stock {
            return Err(CartError::InsufficientStock {
                product: self.id,
                requested: quantity,
                available: self.stock,
            });
        }

        Ok(())
    }
}
