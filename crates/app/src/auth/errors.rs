//! Auth session errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please provide both email and password")]
    MissingCredentials,

    #[error("auth request failed")]
    Api(#[from] ApiError),
}
