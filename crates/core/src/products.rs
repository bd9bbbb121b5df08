//! Products

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::quantity::RequestedQuantity;

/// Reasons a catalog record is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// The record has no usable identifier.
    #[error("product is missing an identifier")]
    MissingId,

    /// The record has no display name.
    #[error("product is missing a name")]
    MissingName,

    /// The record has no price.
    #[error("product is missing a price")]
    MissingPrice,

    /// The record has a price below zero.
    #[error("product price cannot be negative")]
    NegativePrice,

    /// The record has no unit of sale.
    #[error("product is missing a unit")]
    MissingUnit,

    /// The record has no stock ceiling, or one below 1.
    #[error("product stock ceiling must be a positive integer")]
    InvalidMaxQuantity,

    /// The price times the stock ceiling does not fit a decimal.
    #[error("product price is too large")]
    PriceOutOfRange,
}

/// Product record as received from the catalog, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Catalog identifier
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Price per unit
    #[serde(default, alias = "price")]
    pub unit_price: Option<Decimal>,

    /// Category
    #[serde(default)]
    pub category: Option<String>,

    /// Unit of sale, e.g. "kg"
    #[serde(default)]
    pub unit: Option<String>,

    /// Maximum quantity per order
    #[serde(default)]
    pub max_quantity: Option<i64>,

    /// Availability flag
    #[serde(default)]
    pub in_stock: Option<bool>,

    /// Image location
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

/// A validated catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Price per unit
    pub unit_price: Decimal,

    /// Category
    pub category: Option<String>,

    /// Unit of sale
    pub unit: String,

    /// Maximum quantity a single order may request
    pub max_quantity: u32,

    /// Whether the product can currently be ordered
    pub in_stock: bool,

    /// Image location
    pub image_url: Option<String>,
}

impl Product {
    /// Quantity a picker should show for the given input.
    ///
    /// Unparseable or non-positive input falls back to 1, and anything above
    /// the stock ceiling is capped to it.
    pub fn clamp_selection(&self, requested: impl Into<RequestedQuantity>) -> u32 {
        requested
            .into()
            .positive()
            .map_or(1, |quantity| quantity.min(self.max_quantity))
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = non_blank(record.id).ok_or(ProductError::MissingId)?;
        let name = non_blank(record.name).ok_or(ProductError::MissingName)?;
        let unit_price = record.unit_price.ok_or(ProductError::MissingPrice)?;

        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(ProductError::NegativePrice);
        }

        let unit = non_blank(record.unit).ok_or(ProductError::MissingUnit)?;

        let max_quantity = record
            .max_quantity
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| *value > 0)
            .ok_or(ProductError::InvalidMaxQuantity)?;

        if unit_price.checked_mul(Decimal::from(max_quantity)).is_none() {
            return Err(ProductError::PriceOutOfRange);
        }

        Ok(Product {
            id,
            name,
            description: non_blank(record.description),
            unit_price,
            category: non_blank(record.category),
            unit,
            max_quantity,
            in_stock: record.in_stock.unwrap_or(false),
            image_url: non_blank(record.image_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Client-side narrowing of a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category to keep; `None` keeps every category.
    pub category: Option<String>,

    /// Case-insensitive text matched against name and description.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Whether the product passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| product.category.as_deref() == Some(category));

        if !category_matches {
            return false;
        }

        let Some(search) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
        else {
            return true;
        };

        let needle = search.to_lowercase();

        product.name.to_lowercase().contains(&needle)
            || product
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
    }

    /// Keep only the products that pass this filter, preserving order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn milk_record() -> ProductRecord {
        ProductRecord {
            id: Some("p1".to_string()),
            name: Some("Milk".to_string()),
            description: Some("Full cream milk".to_string()),
            unit_price: Some(Decimal::from(50)),
            category: Some("Dairy".to_string()),
            unit: Some("ltr".to_string()),
            max_quantity: Some(5),
            in_stock: Some(true),
            image_url: None,
        }
    }

    #[test]
    fn valid_record_converts() -> TestResult {
        let product = Product::try_from(milk_record())?;

        assert_eq!(product.id, "p1");
        assert_eq!(product.unit_price, Decimal::from(50));
        assert_eq!(product.max_quantity, 5);
        assert!(product.in_stock);

        Ok(())
    }

    #[test]
    fn missing_fields_are_rejected() {
        let cases = [
            (ProductRecord { id: None, ..milk_record() }, ProductError::MissingId),
            (
                ProductRecord {
                    id: Some("  ".to_string()),
                    ..milk_record()
                },
                ProductError::MissingId,
            ),
            (
                ProductRecord {
                    name: None,
                    ..milk_record()
                },
                ProductError::MissingName,
            ),
            (
                ProductRecord {
                    unit_price: None,
                    ..milk_record()
                },
                ProductError::MissingPrice,
            ),
            (
                ProductRecord {
                    unit_price: Some(Decimal::from(-1)),
                    ..milk_record()
                },
                ProductError::NegativePrice,
            ),
            (
                ProductRecord {
                    unit: None,
                    ..milk_record()
                },
                ProductError::MissingUnit,
            ),
            (
                ProductRecord {
                    max_quantity: Some(0),
                    ..milk_record()
                },
                ProductError::InvalidMaxQuantity,
            ),
            (
                ProductRecord {
                    max_quantity: None,
                    ..milk_record()
                },
                ProductError::InvalidMaxQuantity,
            ),
            (
                ProductRecord {
                    unit_price: Some(Decimal::MAX),
                    max_quantity: Some(2),
                    ..milk_record()
                },
                ProductError::PriceOutOfRange,
            ),
        ];

        for (record, expected) in cases {
            assert_eq!(Product::try_from(record), Err(expected.clone()), "{expected}");
        }
    }

    #[test]
    fn free_products_are_allowed() -> TestResult {
        let product = Product::try_from(ProductRecord {
            unit_price: Some(Decimal::ZERO),
            ..milk_record()
        })?;

        assert!(product.unit_price.is_zero());

        Ok(())
    }

    #[test]
    fn missing_stock_flag_means_out_of_stock() -> TestResult {
        let product = Product::try_from(ProductRecord {
            in_stock: None,
            ..milk_record()
        })?;

        assert!(!product.in_stock);

        Ok(())
    }

    #[test]
    fn deserializes_catalog_payload_with_legacy_names() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"_id":"p9","name":"Bread","price":35.5,"unit":"pcs","maxQuantity":3,"inStock":true,"image":"http://img/bread.png"}"#,
        )?;

        let product = Product::try_from(record)?;

        assert_eq!(product.id, "p9");
        assert_eq!(product.unit_price, Decimal::new(355, 1));
        assert_eq!(product.image_url.as_deref(), Some("http://img/bread.png"));

        Ok(())
    }

    #[test]
    fn clamp_selection_bounds_the_picker() -> TestResult {
        let product = Product::try_from(milk_record())?;

        assert_eq!(product.clamp_selection("abc"), 1);
        assert_eq!(product.clamp_selection(0_i64), 1);
        assert_eq!(product.clamp_selection(3_u32), 3);
        assert_eq!(product.clamp_selection(40_u32), 5);

        Ok(())
    }

    #[test]
    fn filter_matches_category_and_search() -> TestResult {
        let milk = Product::try_from(milk_record())?;
        let bread = Product::try_from(ProductRecord {
            id: Some("p2".to_string()),
            name: Some("Bread".to_string()),
            description: None,
            category: Some("Bakery".to_string()),
            ..milk_record()
        })?;
        let products = [milk, bread];

        let dairy = ProductFilter {
            category: Some("Dairy".to_string()),
            search: None,
        };
        let cream = ProductFilter {
            category: None,
            search: Some("CREAM".to_string()),
        };
        let blank = ProductFilter {
            category: None,
            search: Some("   ".to_string()),
        };

        assert_eq!(dairy.apply(&products).len(), 1);
        assert_eq!(cream.apply(&products).first().map(|p| p.id.as_str()), Some("p1"));
        assert_eq!(blank.apply(&products).len(), 2);

        Ok(())
    }
}
