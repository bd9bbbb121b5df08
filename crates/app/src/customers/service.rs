//! Customer session service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::{Deserialize, de::IgnoredAny};

use crate::{
    api::{ApiClient, ApiError},
    customers::name::CustomerName,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionData {
    #[serde(default)]
    customer_name: Option<String>,
}

#[async_trait]
impl CustomerSessionService for ApiClient {
    async fn get_session(&self) -> Result<Option<String>, ApiError> {
        let request = self.request(Method::GET, "/customer/session");

        let envelope = self.send::<SessionData>(request).await?;

        Ok(envelope
            .data
            .and_then(|data| data.customer_name)
            .filter(|name| !name.trim().is_empty()))
    }

    async fn set_session(&self, name: &CustomerName) -> Result<String, ApiError> {
        let request = self
            .request(Method::POST, "/customer/session")
            .json(&serde_json::json!({ "customerName": name.as_str() }));

        let data: SessionData = self.send(request).await?.into_data("customer session")?;

        Ok(data
            .customer_name
            .unwrap_or_else(|| name.as_str().to_string()))
    }

    async fn clear_session(&self) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, "/customer/session");

        self.send::<IgnoredAny>(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CustomerSessionService: Send + Sync {
    /// Name attached to the current session cookie, if any.
    async fn get_session(&self) -> Result<Option<String>, ApiError>;

    /// Attach a name to the session. Returns the name the API stored.
    async fn set_session(&self, name: &CustomerName) -> Result<String, ApiError>;

    /// Drop the session.
    async fn clear_session(&self) -> Result<(), ApiError>;
}
