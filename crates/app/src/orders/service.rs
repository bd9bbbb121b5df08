//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::de::IgnoredAny;
use storefront::orders::OrderStatus;

use crate::{
    api::{ApiClient, ApiError},
    orders::models::{NewOrder, Order, OrderPage, OrderQuery},
};

#[async_trait]
impl OrderService for ApiClient {
    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError> {
        let request = self.request(Method::POST, "/orders").json(&order);

        self.send(request).await?.into_data("order")
    }

    async fn get_order(&self, id: &str) -> Result<Order, ApiError> {
        let request = self.request(Method::GET, &format!("/orders/public/{id}"));

        self.send(request).await?.into_data("order")
    }

    async fn get_admin_order(&self, id: &str) -> Result<Order, ApiError> {
        let request = self.request(Method::GET, &format!("/orders/{id}"));

        self.send(request).await?.into_data("order")
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, ApiError> {
        let request = self.request(Method::GET, "/orders").query(&query.to_pairs());

        let envelope = self.send::<Vec<Order>>(request).await?;
        let total = envelope.total;
        let orders = envelope.into_data("orders")?;

        Ok(OrderPage {
            total: total.unwrap_or_else(|| u64::try_from(orders.len()).unwrap_or(u64::MAX)),
            orders,
        })
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), ApiError> {
        let request = self
            .request(Method::PUT, &format!("/orders/{id}/status"))
            .json(&serde_json::json!({ "status": status }));

        self.send::<IgnoredAny>(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit an order on behalf of the current customer.
    async fn create_order(&self, order: NewOrder) -> Result<Order, ApiError>;

    /// Fetch an order through the public, customer-facing endpoint.
    async fn get_order(&self, id: &str) -> Result<Order, ApiError>;

    /// Fetch an order with admin credentials.
    async fn get_admin_order(&self, id: &str) -> Result<Order, ApiError>;

    /// List orders with admin credentials.
    async fn list_orders(&self, query: OrderQuery) -> Result<OrderPage, ApiError>;

    /// Move an order to a new status.
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<(), ApiError>;
}
