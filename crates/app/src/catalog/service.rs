//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use storefront::products::{Product, ProductRecord};
use tracing::warn;

use crate::{
    api::{ApiClient, ApiError},
    catalog::models::{NewProduct, ProductQuery},
};

#[async_trait]
impl CatalogService for ApiClient {
    async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, "/products").query(&query.to_pairs());

        let records: Vec<ProductRecord> = self.send(request).await?.into_data("products")?;

        Ok(validated_products(records))
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let request = self.request(Method::GET, &format!("/products/{id}"));

        let record: ProductRecord = self.send(request).await?.into_data("product")?;

        Ok(Product::try_from(record)?)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ApiError> {
        let request = self.request(Method::POST, "/products").json(&product);

        let record: ProductRecord = self.send(request).await?.into_data("product")?;

        Ok(Product::try_from(record)?)
    }

    async fn update_product(&self, id: &str, product: NewProduct) -> Result<Product, ApiError> {
        let request = self
            .request(Method::PUT, &format!("/products/{id}"))
            .json(&product);

        let record: ProductRecord = self.send(request).await?.into_data("product")?;

        Ok(Product::try_from(record)?)
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/products/{id}"));

        self.send::<serde::de::IgnoredAny>(request).await?;

        Ok(())
    }
}

/// Convert catalog records, dropping the ones that fail validation.
pub fn validated_products(records: Vec<ProductRecord>) -> Vec<Product> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();

            Product::try_from(record)
                .inspect_err(|error| warn!(?id, %error, "skipping invalid catalog record"))
                .ok()
        })
        .collect()
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List products matching the query.
    async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, ApiError>;

    /// Fetch one product.
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;

    /// Create a product. Requires an admin session.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ApiError>;

    /// Replace a product. Requires an admin session.
    async fn update_product(&self, id: &str, product: NewProduct) -> Result<Product, ApiError>;

    /// Delete a product. Requires an admin session.
    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn record(id: &str, max_quantity: i64) -> ProductRecord {
        ProductRecord {
            id: Some(id.to_string()),
            name: Some(format!("Product {id}")),
            unit_price: Some(Decimal::from(10)),
            unit: Some("pcs".to_string()),
            max_quantity: Some(max_quantity),
            in_stock: Some(true),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn invalid_records_are_dropped() {
        let products = validated_products(vec![record("a", 3), record("b", 0), record("c", 1)]);

        let ids: Vec<&str> = products.iter().map(|product| product.id.as_str()).collect();

        assert_eq!(ids, ["a", "c"]);
    }
}
