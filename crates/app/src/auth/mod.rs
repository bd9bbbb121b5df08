//! Authentication

mod errors;
mod models;
mod service;
mod session;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use session::{AdminSession, AdminState, SESSION_RECHECK_INTERVAL, TOKEN_STORAGE_KEY};
