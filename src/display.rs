//! Presentation helpers
//!
//! Pure formatting of carts and orders for terminals and logs. Nothing here
//! mutates its input.

use std::io;

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    money::{self, Amount},
    orders::{OrderStatus, PaymentStatus},
};

mod cart_view;
mod order_view;
mod timeline;

pub use cart_view::{CartSummary, CartSummaryRow};
pub use order_view::OrderSummary;
pub use timeline::{OrderTimeline, StepState, TimelineStep};

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Format an amount as `KES 1,234.50`: ISO code, grouped major units, then
/// the currency's minor digits.
pub fn format_amount(amount: &Amount) -> String {
    let major = money::to_major(amount);
    let sign = if major.is_sign_negative() { "-" } else { "" };
    let digits = major.abs().to_string();

    let grouped = match digits.split_once('.') {
        Some((whole, fraction)) => format!("{}.{fraction}", group_thousands(whole)),
        None => group_thousands(&digits),
    };

    format!("{} {sign}{grouped}", amount.currency().iso_alpha_code)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM` in UTC.
pub fn format_timestamp(at: Timestamp) -> String {
    at.strftime("%Y-%m-%d %H:%M").to_string()
}

/// Human label for an order status.
pub const fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Confirmed => "Confirmed",
        OrderStatus::Processing => "Processing",
        OrderStatus::Shipped => "Shipped",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

/// Human label for a payment status.
pub const fn payment_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Awaiting payment",
        PaymentStatus::Paid => "Paid",
        PaymentStatus::Failed => "Payment failed",
        PaymentStatus::Refunded => "Refunded",
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(ch);
    }

    grouped
}
