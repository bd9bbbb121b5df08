//! Cart

mod errors;
mod items;
mod store;
mod summary;
mod totals;

pub use errors::CartError;
pub use items::{CartLineItem, MalformedCart, parse_line_items};
pub use store::{CART_STORAGE_KEY, CartStore, QuantityUpdate, StockAdjustment};
pub use summary::write_cart_summary;
pub use totals::CartTotals;
