//! Customers

mod name;
mod service;
mod session;

pub use name::{CustomerName, CustomerNameError, MAX_NAME_CHARS, MIN_NAME_CHARS};
pub use service::*;
pub use session::{CustomerSession, CustomerSessionError, CustomerState};
