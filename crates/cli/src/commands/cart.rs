//! Cart subcommands

use std::io::Write;

use mavuno::{cart::CartItemId, display::CartSummary, products::ProductId};
use mavuno_app::{
    context::AppContext,
    domain::carts::{AlreadyConfirmed, CartManager, Confirm},
};

use crate::{
    commands::{CartCommand, CommandError, write_notice},
    prompt::StdinConfirm,
};

pub(super) async fn run(
    command: CartCommand,
    app: &AppContext,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let manager = app.cart_manager();

    manager.load().await?;

    let notice = match command {
        CartCommand::Show => None,
        CartCommand::Add { product, quantity } => {
            Some(manager.add_item(ProductId::new(product), quantity).await?)
        }
        CartCommand::Set { line, quantity } => Some(
            manager
                .update_quantity(CartItemId::new(line), quantity)
                .await?,
        ),
        CartCommand::Remove { line } => Some(manager.remove_item(CartItemId::new(line)).await?),
        CartCommand::Clear { yes } => {
            let confirm: &dyn Confirm = if yes { &AlreadyConfirmed } else { &StdinConfirm };

            Some(manager.clear_cart(confirm).await?)
        }
    };

    if let Some(notice) = notice {
        write_notice(out, &notice)?;
    }

    render(&manager, out)
}

fn render(manager: &CartManager, out: &mut impl Write) -> Result<(), CommandError> {
    CartSummary::from_snapshot(&manager.snapshot()).write_to(out)?;

    Ok(())
}
