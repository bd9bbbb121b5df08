//! Catalog Models

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use storefront::products::Product;

use crate::forms::FormErrors;

/// Server-side narrowing of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category to list; `None` lists every category.
    pub category: Option<String>,

    /// Text search
    pub search: Option<String>,

    /// Page number, starting at 1
    pub page: Option<u32>,

    /// Page size
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query string pairs, skipping unset and blank values.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(category) = non_blank(self.category.as_deref())
            .filter(|category| !category.eq_ignore_ascii_case("all"))
        {
            pairs.push(("category", category.to_string()));
        }

        if let Some(search) = non_blank(self.search.as_deref()) {
            pairs.push(("search", search.to_string()));
        }

        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        pairs
    }
}

/// Product payload sent when creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Display name
    pub name: String,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Price per unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Category
    pub category: String,

    /// Availability flag
    pub in_stock: bool,

    /// Unit of sale
    pub unit: String,

    /// Maximum quantity per order
    pub max_quantity: u32,

    /// Image location
    pub image_url: String,
}

/// Category choice that asks for a free-text category instead.
pub const OTHER_CATEGORY: &str = "Other";

/// Product form input as typed by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub custom_category: String,
    pub stock: String,
    pub unit: String,
    pub max_quantity: String,
    pub image_url: String,
}

impl ProductDraft {
    /// Validate the form and build the payload to send.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    pub fn validate(&self) -> Result<NewProduct, FormErrors> {
        let mut errors = FormErrors::new();

        let name = self.name.trim();

        if name.is_empty() {
            errors.push("name", "Product name is required");
        }

        let price = match self.price.trim() {
            "" => {
                errors.push("price", "Price is required");
                None
            }
            text => match Decimal::from_str(text) {
                Ok(price) if price > Decimal::ZERO => Some(price),
                _ => {
                    errors.push("price", "Price must be a positive number");
                    None
                }
            },
        };

        let category = match self.category.trim() {
            "" => {
                errors.push("category", "Category is required");
                None
            }
            OTHER_CATEGORY => match self.custom_category.trim() {
                "" => {
                    errors.push("customCategory", "Please enter a category name");
                    None
                }
                custom => Some(custom),
            },
            category => Some(category),
        };

        let stock = match self.stock.trim() {
            "" => {
                errors.push("stock", "Stock quantity is required");
                None
            }
            text => match text.parse::<i64>() {
                Ok(stock) if stock >= 0 => Some(stock),
                _ => {
                    errors.push("stock", "Stock must be a non-negative number");
                    None
                }
            },
        };

        let max_quantity = match self.max_quantity.trim() {
            "" => {
                errors.push("maxQuantity", "Maximum order quantity is required");
                None
            }
            text => match text.parse::<u32>() {
                Ok(max) if max > 0 => Some(max),
                _ => {
                    errors.push("maxQuantity", "Maximum quantity must be a positive number");
                    None
                }
            },
        };

        let image_url = self.image_url.trim();

        if image_url.is_empty() {
            errors.push("image", "Image URL is required");
        } else if !is_http_url(image_url) {
            errors.push("image", "Please enter a valid URL");
        }

        let (Some(price), Some(category), Some(stock), Some(max_quantity)) =
            (price, category, stock, max_quantity)
        else {
            return Err(errors);
        };

        errors.into_result(NewProduct {
            name: name.to_string(),
            description: non_blank(Some(self.description.as_str())).map(str::to_string),
            price,
            category: category.to_string(),
            in_stock: stock > 0,
            unit: match self.unit.trim() {
                "" => "pcs".to_string(),
                unit => unit.to_string(),
            },
            max_quantity,
            image_url: image_url.to_string(),
        })
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.unit_price.to_string(),
            category: product.category.clone().unwrap_or_default(),
            custom_category: String::new(),
            stock: if product.in_stock { "1" } else { "0" }.to_string(),
            unit: product.unit.clone(),
            max_quantity: product.max_quantity.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Distinct categories in listing order.
pub fn distinct_categories(products: &[Product]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();

    for category in products.iter().filter_map(|product| product.category.as_deref()) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
}

fn is_http_url(text: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .filter_map(|scheme| text.strip_prefix(scheme))
        .any(|rest| !rest.is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: " Paneer ".to_string(),
            description: String::new(),
            price: "120.50".to_string(),
            category: "Dairy".to_string(),
            custom_category: String::new(),
            stock: "12".to_string(),
            unit: "gm".to_string(),
            max_quantity: "5".to_string(),
            image_url: "https://img.example/paneer.png".to_string(),
        }
    }

    #[test]
    fn valid_draft_builds_payload() -> TestResult {
        let product = draft().validate()?;

        assert_eq!(product.name, "Paneer");
        assert_eq!(product.price, Decimal::new(12050, 2));
        assert_eq!(product.description, None);
        assert!(product.in_stock);
        assert_eq!(product.max_quantity, 5);

        Ok(())
    }

    #[test]
    fn zero_stock_means_out_of_stock() -> TestResult {
        let product = ProductDraft {
            stock: "0".to_string(),
            ..draft()
        }
        .validate()?;

        assert!(!product.in_stock);

        Ok(())
    }

    #[test]
    fn other_category_uses_the_custom_name() -> TestResult {
        let product = ProductDraft {
            category: OTHER_CATEGORY.to_string(),
            custom_category: "Spices".to_string(),
            ..draft()
        }
        .validate()?;

        assert_eq!(product.category, "Spices");

        let missing = ProductDraft {
            category: OTHER_CATEGORY.to_string(),
            ..draft()
        }
        .validate();

        assert_eq!(
            missing.err().and_then(|errors| errors.get("customCategory")),
            Some("Please enter a category name")
        );

        Ok(())
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let errors = ProductDraft {
            name: "   ".to_string(),
            price: "-3".to_string(),
            category: String::new(),
            stock: "many".to_string(),
            max_quantity: "0".to_string(),
            image_url: "ftp://files/paneer.png".to_string(),
            ..draft()
        }
        .validate()
        .err()
        .unwrap_or_default();

        assert_eq!(errors.get("name"), Some("Product name is required"));
        assert_eq!(errors.get("price"), Some("Price must be a positive number"));
        assert_eq!(errors.get("category"), Some("Category is required"));
        assert_eq!(errors.get("stock"), Some("Stock must be a non-negative number"));
        assert_eq!(
            errors.get("maxQuantity"),
            Some("Maximum quantity must be a positive number")
        );
        assert_eq!(errors.get("image"), Some("Please enter a valid URL"));
    }

    #[test]
    fn missing_fields_have_their_own_messages() {
        let errors = ProductDraft::default().validate().err().unwrap_or_default();

        assert_eq!(errors.get("price"), Some("Price is required"));
        assert_eq!(errors.get("stock"), Some("Stock quantity is required"));
        assert_eq!(errors.get("maxQuantity"), Some("Maximum order quantity is required"));
        assert_eq!(errors.get("image"), Some("Image URL is required"));
    }

    #[test]
    fn payload_sends_price_as_a_number() -> TestResult {
        let json = serde_json::to_value(draft().validate()?)?;

        assert_eq!(json.get("price"), Some(&serde_json::json!(120.5)));
        assert_eq!(json.get("maxQuantity"), Some(&serde_json::json!(5)));
        assert_eq!(
            json.get("imageUrl"),
            Some(&serde_json::json!("https://img.example/paneer.png"))
        );
        assert!(json.get("description").is_none(), "{json}");

        Ok(())
    }

    #[test]
    fn query_skips_blank_and_all_categories() {
        let query = ProductQuery {
            category: Some("All".to_string()),
            search: Some("  milk ".to_string()),
            page: Some(2),
            limit: None,
        };

        assert_eq!(
            query.to_pairs(),
            vec![("search", "milk".to_string()), ("page", "2".to_string())]
        );
    }
}
