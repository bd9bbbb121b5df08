//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiConfig, ApiError},
    auth::AuthService,
    catalog::CatalogService,
    customers::CustomerSessionService,
    orders::OrderService,
    stats::StatsService,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build API client")]
    Api(#[source] ApiError),
}

/// Every collaborator the storefront talks to.
#[derive(Clone)]
pub struct AppContext {
    /// Product catalog
    pub catalog: Arc<dyn CatalogService>,
    /// Orders, customer and admin
    pub orders: Arc<dyn OrderService>,
    /// Administrator accounts
    pub auth: Arc<dyn AuthService>,
    /// Named customer session
    pub customers: Arc<dyn CustomerSessionService>,
    /// Dashboard and analytics figures
    pub stats: Arc<dyn StatsService>,

    /// The shared client behind every service, for cookie and token persistence
    pub client: ApiClient,
}

impl AppContext {
    /// Build application context backed by the storefront API.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn from_api_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let client = ApiClient::new(config).map_err(AppInitError::Api)?;

        Ok(Self {
            catalog: Arc::new(client.clone()),
            orders: Arc::new(client.clone()),
            auth: Arc::new(client.clone()),
            customers: Arc::new(client.clone()),
            stats: Arc::new(client.clone()),
            client,
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn services_share_one_client() -> TestResult {
        let context = AppContext::from_api_config(&ApiConfig::default())?;

        context.auth.set_bearer_token(Some("abc".to_string()));

        assert_eq!(context.client.bearer_token().as_deref(), Some("abc"));

        Ok(())
    }

    #[test]
    fn invalid_base_urls_are_rejected() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout: Duration::from_secs(1),
        };

        assert!(
            AppContext::from_api_config(&config).is_err(),
            "invalid URL should fail"
        );
    }
}
