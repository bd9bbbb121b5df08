use std::io::Write;

use clap::{Args, Subcommand};
use jiff::{Timestamp, tz::TimeZone};
use storefront_app::{
    confirmation::{Confirmation, resolve_confirmation},
    routes::Route,
};

use super::{emit, write_order};
use crate::shell::{Shell, Unused, admit};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Show the confirmation for a placed order
    Show {
        /// Order identifier
        id: String,
    },
}

pub(crate) async fn run(command: OrderCommand, shell: &Shell) -> Result<(), String> {
    let OrderSubcommand::Show { id } = command.command;

    let customer = shell.customer().await;

    admit(&Route::OrderConfirmation(id.clone()), &Unused, &customer)?;

    let confirmation = resolve_confirmation(
        &id,
        &shell.confirmations(),
        &customer,
        shell.context.orders.as_ref(),
        Timestamp::now(),
    )
    .await
    .map_err(|error| error.to_string())?;

    let zone = TimeZone::system();

    emit(|out| match &confirmation {
        Confirmation::Cached(record) => {
            writeln!(out, "Thank you for your order, {}!", record.customer_name)?;
            write_order(out, &record.order_data, &zone)
        }
        Confirmation::Fetched(order) => write_order(out, order, &zone),
        Confirmation::Unverified { order_id, reason } => {
            writeln!(out, "Order Placed Successfully")?;
            writeln!(out, "order_id: {order_id}")?;

            match reason {
                Some(reason) => writeln!(out, "{reason}"),
                None => writeln!(out, "Set your customer name to see the order details."),
            }
        }
    })
}
