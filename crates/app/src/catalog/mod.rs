//! Catalog

pub mod models;
mod service;

pub use models::{NewProduct, ProductDraft, ProductQuery, distinct_categories};
pub use service::*;
