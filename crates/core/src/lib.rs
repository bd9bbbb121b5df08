//! Storefront
//!
//! Client-side state for a small general store: the cart and its persistence,
//! validated catalog records, user-visible notices and display formatting.

pub mod cart;
pub mod format;
pub mod notices;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod quantity;
pub mod storage;
