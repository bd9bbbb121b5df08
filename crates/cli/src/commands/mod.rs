use std::io::{self, Write};

use clap::Subcommand;
use jiff::tz::TimeZone;
use storefront::format::{format_currency, format_date_time};
use storefront_app::orders::Order;

use crate::shell::Shell;

mod admin;
mod cart;
mod checkout;
mod customer;
mod order;
mod products;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse the catalog
    Products(products::ProductsCommand),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Manage the customer name orders are placed under
    Customer(customer::CustomerCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// Look up a placed order
    Order(order::OrderCommand),

    /// Store administration
    Admin(admin::AdminCommand),
}

impl Commands {
    pub(crate) async fn run(self, shell: &Shell) -> Result<(), String> {
        match self {
            Commands::Products(command) => products::run(command, shell).await,
            Commands::Cart(command) => cart::run(command, shell).await,
            Commands::Customer(command) => customer::run(command, shell).await,
            Commands::Checkout(args) => checkout::run(args, shell).await,
            Commands::Order(command) => order::run(command, shell).await,
            Commands::Admin(command) => admin::run(command, shell).await,
        }
    }
}

/// Write an order's details and lines.
pub(crate) fn write_order(
    out: &mut impl Write,
    order: &Order,
    zone: &TimeZone,
) -> io::Result<()> {
    writeln!(out, "order_id: {}", order.id)?;
    writeln!(out, "customer: {}", order.customer_name)?;
    writeln!(out, "phone: {}", order.phone)?;

    if let Some(email) = &order.email {
        writeln!(out, "email: {email}")?;
    }

    writeln!(out, "status: {}", order.status.label())?;

    if let Some(created_at) = order.created_at {
        writeln!(out, "placed: {}", format_date_time(created_at, zone))?;
    }

    for line in &order.items {
        writeln!(
            out,
            "  {} x {} {} @ {} = {}",
            line.product.name().unwrap_or("Unknown product"),
            line.quantity,
            line.product.unit().unwrap_or("pcs"),
            format_currency(line.unit_price),
            format_currency(line.line_total())
        )?;
    }

    writeln!(out, "items: {}", order.item_count())?;
    writeln!(out, "total: {}", format_currency(order.total_amount()))?;

    if let Some(notes) = &order.notes {
        writeln!(out, "notes: {notes}")?;
    }

    Ok(())
}

/// Print to stdout, turning write failures into a command error.
pub(crate) fn emit(
    write: impl FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
) -> Result<(), String> {
    write(&mut io::stdout().lock()).map_err(|error| format!("failed to write output: {error}"))
}
