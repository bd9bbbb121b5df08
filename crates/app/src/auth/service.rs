//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::de::IgnoredAny;

use crate::{
    api::{ApiClient, ApiError},
    auth::models::{AdminLogin, AdminUser, Credentials, Registration},
};

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AdminLogin, ApiError> {
        let request = self.request(Method::POST, "/auth/login").json(credentials);

        let envelope = self.send::<AdminUser>(request).await?;
        let token = envelope.token.clone().ok_or(ApiError::MissingData("token"))?;
        let user = envelope.into_data("user")?;

        Ok(AdminLogin { token, user })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let request = self.request(Method::POST, "/auth/logout");

        self.send::<IgnoredAny>(request).await?;

        Ok(())
    }

    async fn current_user(&self) -> Result<AdminUser, ApiError> {
        let request = self.request(Method::GET, "/auth/me");

        self.send(request).await?.into_data("user")
    }

    async fn register(&self, registration: &Registration) -> Result<AdminUser, ApiError> {
        let request = self.request(Method::POST, "/auth/register").json(registration);

        self.send(request).await?.into_data("user")
    }

    fn set_bearer_token(&self, token: Option<String>) {
        self.replace_bearer_token(token.as_deref());
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<AdminLogin, ApiError>;

    /// End the server-side session.
    async fn logout(&self) -> Result<(), ApiError>;

    /// The administrator the current bearer token belongs to.
    async fn current_user(&self) -> Result<AdminUser, ApiError>;

    /// Create another administrator account.
    async fn register(&self, registration: &Registration) -> Result<AdminUser, ApiError>;

    /// Install or remove the bearer token sent with later requests.
    fn set_bearer_token(&self, token: Option<String>);
}
