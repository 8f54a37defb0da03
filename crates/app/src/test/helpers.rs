//! Test Helpers

use jiff::Timestamp;
use rusty_money::{Money, iso::KES};

use mavuno::{
    cart::{CartError, CartItemId, CartLineItem, CartSnapshot},
    money::Amount,
    orders::{Order, OrderDetails, OrderId, OrderStatus, PaymentStatus},
    products::ProductId,
};

pub(crate) fn kes(minor: i64) -> Amount {
    Money::from_minor(minor, KES)
}

pub(crate) fn line(
    id: u64,
    product: u64,
    quantity: u32,
    unit_minor: i64,
) -> Result<CartLineItem, CartError> {
    CartLineItem::new(
        CartItemId::new(id),
        ProductId::new(product),
        quantity,
        kes(unit_minor),
    )
}

/// Two trays of eggs at KES 180.00.
pub(crate) fn single_eggs_line() -> Result<CartSnapshot, CartError> {
    CartSnapshot::with_items([line(1, 7, 2, 18_000)?], None, KES)
}

/// Eggs as above plus one jar of honey at KES 950.00.
pub(crate) fn eggs_and_honey() -> Result<CartSnapshot, CartError> {
    CartSnapshot::with_items(
        [line(1, 7, 2, 18_000)?, line(2, 11, 1, 95_000)?],
        None,
        KES,
    )
}

pub(crate) fn order(id: u64, status: OrderStatus) -> Order {
    Order::new(OrderDetails {
        id: OrderId::new(id),
        order_number: format!("ORD-{id:04}"),
        status,
        payment_status: PaymentStatus::Paid,
        total_amount: kes(54_000),
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        shipped_at: None,
        delivered_at: None,
    })
}
