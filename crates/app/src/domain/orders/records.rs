//! Order Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use mavuno::{
    money,
    orders::{Order, OrderDetails, OrderId, OrderItem, OrderStatus, PaymentStatus},
    products::ProductId,
};

use crate::domain::orders::{errors::OrdersServiceError, models::StatusUpdated};

/// `GET /orders/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: u64,
    pub order_number: String,
    pub status: OrderStatus,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    pub total_amount: Decimal,

    #[serde(default)]
    pub items: Vec<OrderItemRecord>,

    pub created_at: Timestamp,

    #[serde(default)]
    pub shipped_at: Option<Timestamp>,

    #[serde(default)]
    pub delivered_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    pub product_id: u64,

    #[serde(alias = "productName")]
    pub name: String,

    pub quantity: u32,
    pub unit_price: Decimal,

    #[serde(default)]
    pub line_total: Option<Decimal>,
}

/// `PUT /orders/{id}/status` body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// `PUT /orders/{id}/status` response
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusUpdatedRecord {
    pub message: Option<String>,
}

impl OrderRecord {
    /// Convert into an order priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be represented.
    pub fn into_order(self, currency: &'static Currency) -> Result<Order, OrdersServiceError> {
        let items = self
            .items
            .into_iter()
            .map(|item| item.into_item(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order::new(OrderDetails {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            status: self.status,
            payment_status: self.payment_status,
            total_amount: money::from_major(self.total_amount, currency)?,
            items,
            created_at: self.created_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
        }))
    }
}

impl OrderItemRecord {
    fn into_item(self, currency: &'static Currency) -> Result<OrderItem, OrdersServiceError> {
        let unit_price = money::from_major(self.unit_price, currency)?;

        let line_total = match self.line_total {
            Some(total) => money::from_major(total, currency)?,
            None => money::line_total(unit_price, self.quantity)?,
        };

        Ok(OrderItem {
            product_id: ProductId::new(self.product_id),
            name: self.name,
            quantity: self.quantity,
            unit_price,
            line_total,
        })
    }
}

impl From<StatusUpdatedRecord> for StatusUpdated {
    fn from(record: StatusUpdatedRecord) -> Self {
        Self {
            message: record.message,
        }
    }
}
