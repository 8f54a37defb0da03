//! Cart Records
//!
//! JSON shapes exchanged with the backend. Amounts arrive as major-unit
//! decimals (numbers or strings) and are converted to minor units here.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use tracing::warn;

use mavuno::{
    cart::{CartItemId, CartLineItem, CartSnapshot},
    money::{self, Amount, AmountError},
    products::ProductId,
};

use crate::domain::carts::{
    errors::CartsServiceError,
    models::{AddedCartItem, CartAck, NewCartItem},
};

/// `GET /cart`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartRecord {
    #[serde(default)]
    pub items: Vec<CartItemRecord>,

    #[serde(default)]
    pub total: Option<Decimal>,
}

/// A line item on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,
    pub unit_price: Decimal,

    #[serde(default)]
    pub line_total: Option<Decimal>,
}

/// `POST /cart/add` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: u64,
    pub quantity: u32,
}

/// `POST /cart/add` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddToCartResponse {
    #[serde(default = "accepted")]
    pub ok: bool,

    pub message: Option<String>,
    pub item: Option<CartItemRecord>,
    pub total: Option<Decimal>,
}

/// `PUT /cart/{id}` body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityRequest {
    pub quantity: u32,
}

/// Response to `PUT /cart/{id}`, `DELETE /cart/{id}` and `DELETE /cart`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CartAckRecord {
    pub message: Option<String>,
    pub total: Option<Decimal>,
}

const fn accepted() -> bool {
    true
}

impl CartItemRecord {
    /// Convert into a line item priced in `currency`.
    ///
    /// The line total is always derived from quantity and unit price; a
    /// disagreeing backend figure is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity or an unrepresentable price.
    pub fn into_line_item(
        self,
        currency: &'static Currency,
    ) -> Result<CartLineItem, CartsServiceError> {
        let unit_price = money::from_major(self.unit_price, currency)?;

        let item = CartLineItem::new(
            CartItemId::new(self.id),
            ProductId::new(self.product_id),
            self.quantity,
            unit_price,
        )?;

        if let Some(line_total) = self.line_total
            && money::from_major(line_total, currency)? != item.line_total()
        {
            warn!(
                line = self.id,
                %line_total,
                "backend line total disagrees with quantity x unit price"
            );
        }

        Ok(item)
    }
}

impl CartRecord {
    /// Convert into a snapshot priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if any line or the total cannot be converted.
    pub fn into_snapshot(
        self,
        currency: &'static Currency,
    ) -> Result<CartSnapshot, CartsServiceError> {
        let items = self
            .items
            .into_iter()
            .map(|item| item.into_line_item(currency))
            .collect::<Result<Vec<_>, _>>()?;

        let total = amount(self.total, currency)?;

        Ok(CartSnapshot::with_items(items, total, currency)?)
    }
}

impl AddToCartResponse {
    /// Convert into the domain answer, turning `ok: false` into a rejection.
    ///
    /// # Errors
    ///
    /// [`CartsServiceError::Rejected`] when the backend refused the item, or a
    /// conversion error.
    pub fn into_added(self, currency: &'static Currency) -> Result<AddedCartItem, CartsServiceError> {
        if !self.ok {
            return Err(CartsServiceError::Rejected(
                self.message
                    .unwrap_or_else(|| "Could not add the item to your cart".to_string()),
            ));
        }

        Ok(AddedCartItem {
            item: self
                .item
                .map(|item| item.into_line_item(currency))
                .transpose()?,
            total: amount(self.total, currency)?,
            message: self.message,
        })
    }
}

impl CartAckRecord {
    /// Convert into the domain answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the total cannot be converted.
    pub fn into_ack(self, currency: &'static Currency) -> Result<CartAck, CartsServiceError> {
        Ok(CartAck {
            total: amount(self.total, currency)?,
            message: self.message,
        })
    }
}

impl From<NewCartItem> for AddToCartRequest {
    fn from(item: NewCartItem) -> Self {
        Self {
            product_id: item.product_id.get(),
            quantity: item.quantity,
        }
    }
}

fn amount(
    value: Option<Decimal>,
    currency: &'static Currency,
) -> Result<Option<Amount>, AmountError> {
    value.map(|value| money::from_major(value, currency)).transpose()
}
