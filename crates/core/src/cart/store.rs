//! Cart Store

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

use crate::{
    notices::{Notice, Notifier},
    products::{Product, ProductRecord},
    quantity::RequestedQuantity,
    storage::Storage,
};

use super::{
    errors::CartError,
    items::{CartLineItem, parse_line_items},
    totals::CartTotals,
};

/// Storage key holding the serialized line items.
pub const CART_STORAGE_KEY: &str = "cart";

/// Outcome of a successful quantity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line item now holds this quantity.
    Set(u32),

    /// The requested quantity was zero or less, so the line item was removed.
    Removed,
}

/// A line item clamped down to its stock ceiling during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Quantity before clamping
    pub from: u32,

    /// Quantity after clamping
    pub to: u32,
}

/// The authoritative cart for one browsing context.
///
/// Every successful mutation recomputes the totals and writes the whole
/// collection back to storage. Failed mutations leave the cart untouched and
/// report through the notifier as well as the returned error.
pub struct CartStore<S: Storage> {
    items: Vec<CartLineItem>,
    totals: CartTotals,
    storage: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Storage> Debug for CartStore<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("totals", &self.totals)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> CartStore<S> {
    /// Open the cart persisted in `storage`.
    ///
    /// A missing entry gives an empty cart. An entry that is not a well-formed
    /// sequence of line items is logged, removed from storage and replaced by
    /// an empty cart.
    pub fn open(storage: S, notifier: Arc<dyn Notifier>) -> Self {
        let items = hydrate(&storage);
        let totals = CartTotals::of(&items);

        Self {
            items,
            totals,
            storage,
            notifier,
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line item for the given product, if present.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals as of the last mutation.
    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    /// Storage backing this cart.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate a raw catalog record and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] when the record fails validation,
    /// otherwise the errors of [`CartStore::add_item`].
    pub fn add_record(
        &mut self,
        record: ProductRecord,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<u32, CartError> {
        match Product::try_from(record) {
            Ok(product) => self.add_item(&product, quantity),
            Err(source) => self.reject(CartError::InvalidProduct(source)),
        }
    }

    /// Add `quantity` of `product`, merging with an existing line item.
    ///
    /// Returns the resulting quantity of that product in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the product is out of stock, the quantity
    /// is not a positive integer, or the quantity (alone or combined with what
    /// is already in the cart) exceeds the product's stock ceiling.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<u32, CartError> {
        if !product.in_stock {
            return self.reject(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }

        let Some(requested) = quantity.into().positive() else {
            return self.reject(CartError::InvalidQuantity);
        };

        if requested > product.max_quantity {
            return self.reject(CartError::ExceedsStock {
                name: product.name.clone(),
                unit: product.unit.clone(),
                max: product.max_quantity,
            });
        }

        let position = self.items.iter().position(|item| item.id == product.id);

        let Some(position) = position else {
            self.items
                .push(CartLineItem::from_product(product, requested));
            self.commit();

            debug!(product = %product.id, quantity = requested, "added line item");

            self.notifier.notify(Notice::success(format!(
                "Added {requested} {} of {} to cart",
                product.unit, product.name
            )));

            return Ok(requested);
        };

        let existing = self.items.get(position).map_or(0, |item| item.quantity);
        let combined = existing.saturating_add(requested);

        if combined > product.max_quantity {
            return self.reject(CartError::ExceedsCeiling {
                name: product.name.clone(),
                unit: product.unit.clone(),
                max: product.max_quantity,
            });
        }

        if let Some(item) = self.items.get_mut(position) {
            item.quantity = combined;
        }

        self.commit();

        debug!(product = %product.id, quantity = combined, "merged line item");

        self.notifier.notify(Notice::success(format!(
            "Updated {} quantity to {combined}",
            product.name
        )));

        Ok(combined)
    }

    /// Set the quantity of an existing line item.
    ///
    /// A quantity of zero or less removes the line item.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when `id` is blank or not in the cart, the
    /// quantity does not parse, or it exceeds the line item's stock ceiling.
    pub fn update_quantity(
        &mut self,
        id: &str,
        quantity: impl Into<RequestedQuantity>,
    ) -> Result<QuantityUpdate, CartError> {
        if id.trim().is_empty() {
            return self.reject(CartError::InvalidId);
        }

        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            return self.reject(CartError::NotInCart { id: id.to_string() });
        };

        let Some(requested) = quantity.into().value() else {
            return self.reject(CartError::InvalidQuantity);
        };

        if requested <= 0 {
            self.remove_item(id);

            return Ok(QuantityUpdate::Removed);
        }

        let Some(item) = self.items.get_mut(position) else {
            return self.reject(CartError::NotInCart { id: id.to_string() });
        };

        let within_ceiling = u32::try_from(requested)
            .ok()
            .filter(|quantity| *quantity <= item.max_quantity);

        let Some(quantity) = within_ceiling else {
            let error = CartError::ExceedsCeiling {
                name: item.name.clone(),
                unit: item.unit.clone(),
                max: item.max_quantity,
            };

            return self.reject(error);
        };

        item.quantity = quantity;
        self.commit();

        debug!(product = %id, quantity, "updated line item");

        Ok(QuantityUpdate::Set(quantity))
    }

    /// Remove the line item for `id`.
    ///
    /// Blank or unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str) -> Option<CartLineItem> {
        if id.trim().is_empty() {
            return None;
        }

        let position = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(position);

        self.commit();

        debug!(product = %id, "removed line item");

        self.notifier
            .notify(Notice::success(format!("Removed {} from cart", removed.name)));

        Some(removed)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();

        debug!("cleared cart");

        self.notifier.notify(Notice::success("Cart cleared"));
    }

    /// Clamp every line item whose quantity exceeds its stock ceiling.
    ///
    /// Emits one warning per clamped line item. Running it again straight
    /// away changes nothing.
    pub fn reconcile(&mut self) -> Vec<StockAdjustment> {
        let mut adjustments = Vec::new();

        for item in &mut self.items {
            if item.quantity > item.max_quantity {
                adjustments.push(StockAdjustment {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    from: item.quantity,
                    to: item.max_quantity,
                });

                item.quantity = item.max_quantity;
            }
        }

        if adjustments.is_empty() {
            return adjustments;
        }

        self.commit();

        for adjustment in &adjustments {
            warn!(
                product = %adjustment.id,
                from = adjustment.from,
                to = adjustment.to,
                "clamped line item to stock ceiling"
            );

            self.notifier.notify(Notice::warning(format!(
                "{} quantity adjusted to the maximum available ({})",
                adjustment.name, adjustment.to
            )));
        }

        adjustments
    }

    /// Refresh stock snapshots from current catalog records, then reconcile.
    pub fn apply_stock_levels(&mut self, products: &[Product]) -> Vec<StockAdjustment> {
        let current: FxHashMap<&str, &Product> = products
            .iter()
            .map(|product| (product.id.as_str(), product))
            .collect();

        let mut refreshed = false;

        for item in &mut self.items {
            let Some(product) = current.get(item.id.as_str()) else {
                continue;
            };

            if item.max_quantity != product.max_quantity || item.in_stock != product.in_stock {
                item.max_quantity = product.max_quantity;
                item.in_stock = product.in_stock;
                refreshed = true;
            }
        }

        let adjustments = self.reconcile();

        // Reconcile only persists when it clamps.
        if refreshed && adjustments.is_empty() {
            self.commit();
        }

        adjustments
    }

    fn reject<T>(&self, error: CartError) -> Result<T, CartError> {
        debug!("rejected cart mutation: {error}");

        self.notifier.notify(Notice::error(error.to_string()));

        Err(error)
    }

    fn commit(&mut self) {
        self.totals = CartTotals::of(&self.items);

        let serialized = match serde_json::to_string(&self.items) {
            Ok(serialized) => serialized,
            Err(source) => {
                error!("failed to serialize cart: {source}");
                return;
            }
        };

        if let Err(source) = self.storage.set(CART_STORAGE_KEY, &serialized) {
            error!("failed to persist cart: {source}");
        }
    }
}

fn hydrate(storage: &impl Storage) -> Vec<CartLineItem> {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(source) => {
            error!("failed to read persisted cart: {source}");
            return Vec::new();
        }
    };

    match parse_line_items(&raw) {
        Ok(items) => items,
        Err(reason) => {
            warn!("discarding persisted cart: {reason}");

            if let Err(source) = storage.remove(CART_STORAGE_KEY) {
                error!("failed to remove corrupt cart: {source}");
            }

            Vec::new()
        }
    }
}
