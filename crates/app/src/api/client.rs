//! HTTP client for the storefront API.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use reqwest::{
    Client, Method, RequestBuilder, StatusCode, Url,
    cookie::{CookieStore, Jar},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{
    ApiError,
    envelope::{Envelope, error_message},
};

/// Configuration for connecting to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API base address, e.g. `"http://localhost:5000/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the storefront API.
///
/// Clones share the cookie jar and the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
    cookies: Arc<Jar>,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|error| ApiError::InvalidUrl(format!("{}: {error}", config.base_url)))?;

        let cookies = Arc::new(Jar::default());

        let http = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base,
            http,
            cookies,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    /// The configured base address.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// The bearer token currently sent with every request.
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install or remove the bearer token.
    pub fn replace_bearer_token(&self, token: Option<&str>) {
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) =
            token.map(str::to_string);
    }

    /// Cookies the API has set, as a `Cookie` header value.
    pub fn export_cookies(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base)
            .and_then(|header| header.to_str().ok().map(str::to_string))
    }

    /// Restore cookies previously returned by [`ApiClient::export_cookies`].
    pub fn import_cookies(&self, header: &str) {
        header
            .split(';')
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .for_each(|pair| self.cookies.add_cookie_str(pair, &self.base));
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));

        match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and unwrap the response envelope.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        debug!(%status, url = %response.url(), "API response");

        if status == StatusCode::UNAUTHORIZED {
            warn!("API rejected the request as unauthorized; dropping bearer token");

            self.replace_bearer_token(None);

            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message(&text)
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            });
        }

        let envelope: Envelope<T> = response.json().await?;

        envelope.checked(status.as_u16())
    }
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.bearer_token().is_some())
            .finish_non_exhaustive()
    }
}
