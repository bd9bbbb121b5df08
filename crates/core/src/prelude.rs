//! Prelude

pub use crate::{
    cart::{CartError, CartLineItem, CartStore, CartTotals, QuantityUpdate, StockAdjustment},
    notices::{Notice, NoticeLevel, NoticeLog, Notifier},
    orders::OrderStatus,
    products::{Product, ProductError, ProductFilter, ProductRecord},
    quantity::RequestedQuantity,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
};
