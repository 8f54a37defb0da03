//! Cart line items

use crate::{
    cart::CartError,
    ids::TypedId,
    money::{self, Amount},
    products::ProductId,
};

/// Cart Line Item Id
pub type CartItemId = TypedId<CartLineItem>;

/// One line of the cart.
///
/// `line_total` is derived from `quantity` and `unit_price` every time either
/// changes, so it is always `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    id: CartItemId,
    product_id: ProductId,
    quantity: u32,
    unit_price: Amount,
    line_total: Amount,
}

impl CartLineItem {
    /// Create a line item, snapshotting the unit price.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::Amount`]: the line total overflows.
    pub fn new(
        id: CartItemId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Amount,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        Ok(Self {
            id,
            product_id,
            quantity,
            unit_price,
            line_total: money::line_total(unit_price, quantity)?,
        })
    }

    /// Line item id
    pub fn id(&self) -> CartItemId {
        self.id
    }

    /// Product this line refers to
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Units on this line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured when the product was added
    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    /// `quantity * unit_price`
    pub fn line_total(&self) -> Amount {
        self.line_total
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        self.line_total = money::line_total(self.unit_price, quantity)?;
        self.quantity = quantity;

        Ok(())
    }
}
