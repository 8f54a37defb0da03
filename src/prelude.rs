//! Mavuno prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartItemId, CartLineItem, CartSnapshot, StagedQuantity},
    display::{
        CartSummary, OrderSummary, OrderTimeline, RenderError, StepState, format_amount,
        format_timestamp,
    },
    ids::TypedId,
    money::{Amount, AmountError},
    orders::{
        InvalidTransition, Order, OrderAction, OrderDetails, OrderId, OrderItem, OrderStatus,
        PaymentStatus, PlannedTransition,
    },
    products::{Product, ProductId},
};
