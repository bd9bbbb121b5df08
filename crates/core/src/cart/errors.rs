//! Cart errors.
//!
//! The `Display` text of each variant is the message shown to the user.

use thiserror::Error;

use crate::products::ProductError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Invalid product data")]
    InvalidProduct(#[source] ProductError),

    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    #[error("Please enter a valid quantity")]
    InvalidQuantity,

    #[error("Only {max} {unit} of {name} available")]
    ExceedsStock { name: String, unit: String, max: u32 },

    #[error("Cannot add more than {max} {unit} of {name}")]
    ExceedsCeiling { name: String, unit: String, max: u32 },

    #[error("Invalid product ID")]
    InvalidId,

    #[error("Item not found in cart")]
    NotInCart { id: String },
}

impl From<ProductError> for CartError {
    fn from(error: ProductError) -> Self {
        Self::InvalidProduct(error)
    }
}
