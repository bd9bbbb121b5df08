//! Storefront API client

mod client;
mod envelope;
mod errors;

pub use client::{ApiClient, ApiConfig};
pub use envelope::Envelope;
pub use errors::ApiError;
