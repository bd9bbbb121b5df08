//! Response envelope.

use serde::Deserialize;

use crate::api::ApiError;

/// The wrapper every API response arrives in.
///
/// Authentication endpoints put their payload under `user` rather than
/// `data`; both land in [`Envelope::data`].
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Explicit outcome flag; absent means the status code decides.
    #[serde(default)]
    pub success: Option<bool>,

    /// Payload
    #[serde(alias = "user")]
    pub data: Option<T>,

    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,

    /// Total number of matching records for paginated listings
    #[serde(default)]
    pub total: Option<u64>,

    /// Bearer token issued by the login endpoint
    #[serde(default)]
    pub token: Option<String>,
}

impl<T> Envelope<T> {
    /// Turn an explicit `success: false` into [`ApiError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] carrying the server message.
    pub fn checked(self, status: u16) -> Result<Self, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected {
                status,
                message: self
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        Ok(self)
    }

    /// Take the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingData`] when the payload is absent.
    pub fn into_data(self, what: &'static str) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData(what))
    }
}

/// Pull the `message` field out of an error body, if it has one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope<serde::de::IgnoredAny>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
}
