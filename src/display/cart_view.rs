//! Cart summary

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    cart::{CartItemId, CartSnapshot},
    display::{RenderError, format_amount},
    products::ProductId,
};

/// A rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummaryRow {
    /// Line item id
    pub line: CartItemId,

    /// Product id
    pub product: ProductId,

    /// Units
    pub quantity: u32,

    /// Formatted unit price
    pub unit_price: String,

    /// Formatted line total
    pub line_total: String,
}

/// A cart ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    rows: Vec<CartSummaryRow>,
    unit_count: u64,
    grand_total: String,
}

impl CartSummary {
    /// Summarise a snapshot.
    pub fn from_snapshot(cart: &CartSnapshot) -> Self {
        let rows = cart
            .items()
            .iter()
            .map(|item| CartSummaryRow {
                line: item.id(),
                product: item.product_id(),
                quantity: item.quantity(),
                unit_price: format_amount(&item.unit_price()),
                line_total: format_amount(&item.line_total()),
            })
            .collect();

        Self {
            rows,
            unit_count: cart.unit_count(),
            grand_total: format_amount(&cart.grand_total()),
        }
    }

    /// Rendered lines
    pub fn rows(&self) -> &[CartSummaryRow] {
        &self.rows
    }

    /// Units across all lines
    pub fn unit_count(&self) -> u64 {
        self.unit_count
    }

    /// Formatted grand total
    pub fn grand_total(&self) -> &str {
        &self.grand_total
    }

    /// Print the cart as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), RenderError> {
        if self.rows.is_empty() {
            writeln!(out, "Your cart is empty.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Line", "Product", "Qty", "Unit Price", "Line Total"]);

        for row in &self.rows {
            builder.push_record([
                row.line.to_string(),
                row.product.to_string(),
                row.quantity.to_string(),
                row.unit_price.clone(),
                row.line_total.clone(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Items: {}", self.unit_count)?;
        writeln!(out, " Total: {}", self.grand_total)?;

        Ok(())
    }
}
