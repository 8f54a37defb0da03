//! Subcommands

use std::io::{self, Write};

use clap::Subcommand;

use mavuno::{display::RenderError, orders::OrderStatus};
use mavuno_app::{context::AppContext, errors::StorefrontError, notices::Notice};
use thiserror::Error;

mod cart;
mod orders;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shopping cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Order administration
    #[command(subcommand)]
    Order(OrderCommand),
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product
    Add {
        product: u64,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Change a line's quantity
    Set {
        line: u64,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove { line: u64 },

    /// Remove every line
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Show an order and the actions on offer
    Show { order: u64 },

    /// Move an order one step forward
    Advance { order: u64 },

    /// Cancel an order
    Cancel { order: u64 },

    /// Move an order to a given status
    Set { order: u64, status: OrderStatus },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    /// The error as a notice.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Storefront(error) => error.notice(),
            other => Notice::error(other.to_string()),
        }
    }
}

/// Run `command`, writing notices and views to `out`.
///
/// # Errors
///
/// Returns the first failure; anything already written stays written.
pub async fn run(
    command: Command,
    app: &AppContext,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        Command::Cart(command) => cart::run(command, app, out).await,
        Command::Order(command) => orders::run(command, app, out).await,
    }
}

fn write_notice(out: &mut impl Write, notice: &Notice) -> Result<(), CommandError> {
    writeln!(out, "{notice}")?;

    Ok(())
}
