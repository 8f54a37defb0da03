//! Order summary

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    display::{
        OrderTimeline, RenderError, format_amount, format_timestamp, payment_label, status_label,
    },
    orders::Order,
};

/// An order rendered for the admin console or the customer.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a> {
    order: &'a Order,
}

impl<'a> OrderSummary<'a> {
    /// Summarise an order.
    pub fn new(order: &'a Order) -> Self {
        Self { order }
    }

    /// Print the header, the ordered lines and the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), RenderError> {
        let order = self.order;

        writeln!(out, "Order {} (#{})", order.order_number(), order.id())?;
        writeln!(out, " Status:  {}", status_label(order.status()))?;
        writeln!(out, " Payment: {}", payment_label(order.payment_status()))?;
        writeln!(out, " Placed:  {}", format_timestamp(order.created_at()))?;
        writeln!(out, " Total:   {}", format_amount(&order.total_amount()))?;

        if !order.items().is_empty() {
            let mut builder = Builder::default();

            builder.push_record(["Product", "Qty", "Unit Price", "Line Total"]);

            for item in order.items() {
                builder.push_record([
                    item.name.clone(),
                    item.quantity.to_string(),
                    format_amount(&item.unit_price),
                    format_amount(&item.line_total),
                ]);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Columns::new(1..4), Alignment::right());

            writeln!(out, "\n{table}")?;
        }

        writeln!(out)?;

        OrderTimeline::for_order(order).write_to(&mut out)
    }
}
