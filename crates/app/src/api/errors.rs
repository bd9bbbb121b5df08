//! API errors.

use storefront::products::ProductError;
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot be parsed.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    /// The API rejected the bearer token, or none was sent.
    #[error("not authorized")]
    Unauthorized,

    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,

    /// The API answered with an error status or `success: false`.
    #[error("{message}")]
    Rejected {
        /// HTTP status code of the response
        status: u16,

        /// Server-provided message, or a description of the status
        message: String,
    },

    /// A successful response did not carry the expected payload.
    #[error("response did not include {0}")]
    MissingData(&'static str),

    /// A product in the response failed validation.
    #[error("invalid product in response")]
    InvalidProduct(#[from] ProductError),
}

impl ApiError {
    /// Message suitable for an error notice, falling back to `fallback` for
    /// failures that carry no server message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
