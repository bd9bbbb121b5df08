//! Stats service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    api::{ApiClient, ApiError},
    stats::models::{Analytics, AnalyticsRange, DashboardStats},
};

#[async_trait]
impl StatsService for ApiClient {
    async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        let request = self.request(Method::GET, "/stats/dashboard");

        self.send(request).await?.into_data("dashboard stats")
    }

    async fn analytics(&self, range: AnalyticsRange) -> Result<Analytics, ApiError> {
        let request = self
            .request(Method::GET, "/stats/analytics")
            .query(&range.to_pairs());

        self.send(request).await?.into_data("analytics")
    }
}

#[automock]
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn dashboard(&self) -> Result<DashboardStats, ApiError>;

    async fn analytics(&self, range: AnalyticsRange) -> Result<Analytics, ApiError>;
}
