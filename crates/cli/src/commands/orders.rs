//! Order subcommands

use std::io::Write;

use mavuno::{display::OrderSummary, orders::OrderId};
use mavuno_app::{context::AppContext, domain::orders::OrderConsole};

use crate::commands::{CommandError, OrderCommand, write_notice};

pub(super) async fn run(
    command: OrderCommand,
    app: &AppContext,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let console = app.order_console();

    let (id, notice) = match command {
        OrderCommand::Show { order } => (load(&console, order).await?, None),
        OrderCommand::Advance { order } => {
            let id = load(&console, order).await?;

            (id, Some(console.advance(id).await?))
        }
        OrderCommand::Cancel { order } => {
            let id = load(&console, order).await?;

            (id, Some(console.cancel(id).await?))
        }
        OrderCommand::Set { order, status } => {
            let id = load(&console, order).await?;

            (id, Some(console.transition(id, status).await?))
        }
    };

    if let Some(notice) = notice {
        write_notice(out, &notice)?;
    }

    render(&console, id, out)
}

async fn load(console: &OrderConsole, order: u64) -> Result<OrderId, CommandError> {
    let id = OrderId::new(order);

    console.load(id).await?;

    Ok(id)
}

fn render(console: &OrderConsole, id: OrderId, out: &mut impl Write) -> Result<(), CommandError> {
    let Some(order) = console.order(id) else {
        return Ok(());
    };

    OrderSummary::new(&order).write_to(&mut *out)?;

    let actions = console.available_actions(id)?;

    if actions.is_empty() {
        writeln!(out, " No further actions")?;
    } else {
        let labels = actions
            .iter()
            .map(|action| action.label())
            .collect::<Vec<_>>()
            .join(" | ");

        writeln!(out, " Actions: {labels}")?;
    }

    Ok(())
}
