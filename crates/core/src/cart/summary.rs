//! Cart Summary Table

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::format::format_currency;

use super::{items::CartLineItem, totals::CartTotals};

/// Write the cart as a table followed by its totals.
///
/// # Errors
///
/// Returns an [`io::Error`] if writing to `out` fails.
pub fn write_cart_summary(
    out: &mut impl io::Write,
    items: &[CartLineItem],
    totals: CartTotals,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Unit price", "Quantity", "Line total"]);

    for (index, item) in items.iter().enumerate() {
        builder.push_record([
            format!("{}", index + 1),
            item.name.clone(),
            format!("{} / {}", format_currency(item.unit_price), item.unit),
            format!("{} of {}", item.quantity, item.max_quantity),
            format_currency(item.line_total()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Items: {}", totals.count())?;
    writeln!(out, " Total: {}", format_currency(totals.total()))
}
