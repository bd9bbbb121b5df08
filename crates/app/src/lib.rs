//! Storefront application layer.
//!
//! The collaborators behind the cart (catalog, orders, admin authentication,
//! the customer name session and store statistics) as async service traits,
//! the HTTP client that implements them, and the flows built on top: session
//! handling, route guards, checkout and order confirmation.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod confirmation;
pub mod context;
pub mod customers;
pub mod forms;
pub mod orders;
pub mod routes;
pub mod stats;
