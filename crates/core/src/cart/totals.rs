//! Cart Totals

use rust_decimal::Decimal;

use super::items::CartLineItem;

/// Totals derived from a cart's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    total: Decimal,
    count: u64,
}

impl CartTotals {
    /// Compute totals for the given line items.
    ///
    /// The sum saturates at [`Decimal::MAX`] rather than overflowing.
    pub fn of(items: &[CartLineItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total: acc.total.saturating_add(item.line_total()),
            count: acc.count.saturating_add(u64::from(item.quantity)),
        })
    }

    /// Sum of `unit_price × quantity`
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Sum of quantities
    pub fn count(&self) -> u64 {
        self.count
    }
}
