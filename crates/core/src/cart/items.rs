//! Cart Line Items

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// One product-and-quantity entry in the cart.
///
/// Everything except `quantity` is a snapshot of the product taken when it was
/// first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product identifier, unique within a cart
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Price per unit
    #[serde(alias = "price")]
    pub unit_price: Decimal,

    /// Image location
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Unit of sale
    pub unit: String,

    /// Quantity in the cart
    pub quantity: u32,

    /// Stock ceiling
    pub max_quantity: u32,

    /// Availability when snapshotted
    pub in_stock: bool,
}

impl CartLineItem {
    /// Snapshot `product` into a new line item.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            image_url: product.image_url.clone(),
            unit: product.unit.clone(),
            quantity,
            max_quantity: product.max_quantity,
            in_stock: product.in_stock,
        }
    }

    /// `unit_price × quantity`, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Why a persisted collection is not a usable cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCart {
    /// The stored text is not a JSON array of line items.
    #[error("not a sequence of line items: {0}")]
    Unreadable(String),

    /// A line item has an empty identifier.
    #[error("line item {0} has no identifier")]
    MissingId(usize),

    /// Two line items share an identifier.
    #[error("duplicate line item {0:?}")]
    DuplicateId(String),

    /// A line item has a zero quantity or stock ceiling.
    #[error("line item {0:?} has a zero quantity or ceiling")]
    ZeroQuantity(String),

    /// A line item has a negative price.
    #[error("line item {0:?} has a negative price")]
    NegativePrice(String),

    /// A line total, or the running cart total, does not fit a decimal.
    #[error("line item {0:?} pushes the cart total out of range")]
    TotalOutOfRange(String),
}

/// Parse and check a persisted collection.
///
/// Quantities above their ceiling are accepted here; reconciliation deals
/// with those.
///
/// # Errors
///
/// Returns a [`MalformedCart`] describing the first problem found.
pub fn parse_line_items(raw: &str) -> Result<Vec<CartLineItem>, MalformedCart> {
    let items: Vec<CartLineItem> =
        serde_json::from_str(raw).map_err(|error| MalformedCart::Unreadable(error.to_string()))?;

    let mut seen = FxHashSet::default();
    let mut total = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(MalformedCart::MissingId(index));
        }

        if !seen.insert(item.id.as_str()) {
            return Err(MalformedCart::DuplicateId(item.id.clone()));
        }

        if item.quantity == 0 || item.max_quantity == 0 {
            return Err(MalformedCart::ZeroQuantity(item.id.clone()));
        }

        if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
            return Err(MalformedCart::NegativePrice(item.id.clone()));
        }

        // Updates may raise the quantity as far as the ceiling.
        let largest = Decimal::from(item.quantity.max(item.max_quantity));

        total = item
            .unit_price
            .checked_mul(largest)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| MalformedCart::TotalOutOfRange(item.id.clone()))?;
    }

    Ok(items)
}
