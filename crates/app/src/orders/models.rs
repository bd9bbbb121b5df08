//! Order Models

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront::{cart::CartLineItem, orders::OrderStatus};

/// Order submission payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Name the order is attributed to
    pub customer_name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Ordered lines
    pub items: Vec<NewOrderLine>,

    /// Sum of line totals
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Amount due
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Free-text instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    /// Catalog identifier
    pub product_id: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Price per unit at the time of ordering
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl From<&CartLineItem> for NewOrderLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// An order as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    #[serde(alias = "_id")]
    pub id: String,

    /// Name the order is attributed to
    #[serde(default)]
    pub customer_name: String,

    /// Contact phone number
    #[serde(default)]
    pub phone: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<OrderLine>,

    /// Sum of line totals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    /// Amount due
    #[serde(default, alias = "totalAmount", skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,

    /// Fulfilment status
    #[serde(default = "pending")]
    pub status: OrderStatus,

    /// Free-text instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Status transitions, oldest first
    #[serde(default)]
    pub status_history: Vec<StatusChange>,

    /// When the order was placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

fn pending() -> OrderStatus {
    OrderStatus::Pending
}

impl Order {
    /// Amount due, falling back to the subtotal and then to the line totals.
    pub fn total_amount(&self) -> Decimal {
        self.total
            .or(self.subtotal)
            .unwrap_or_else(|| self.items.iter().map(OrderLine::line_total).sum())
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Apply a status change that the API has accepted.
    pub fn record_status(&mut self, status: OrderStatus, at: Timestamp) {
        self.status_history.push(StatusChange {
            status: status.clone(),
            timestamp: Some(at),
        });
        self.status = status;
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// The product, either as a bare identifier or with its details
    #[serde(alias = "productId")]
    pub product: OrderProduct,

    /// Quantity ordered
    pub quantity: u32,

    /// Price per unit at the time of ordering
    #[serde(alias = "price")]
    pub unit_price: Decimal,
}

impl OrderLine {
    /// `unit_price × quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Product reference on an order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderProduct {
    /// Only the identifier was returned.
    Id(String),

    /// The product was expanded.
    Details(OrderProductDetails),
}

impl OrderProduct {
    /// Display name, when the API expanded the product.
    pub fn name(&self) -> Option<&str> {
        match self {
            OrderProduct::Id(_) => None,
            OrderProduct::Details(details) => details.name.as_deref(),
        }
    }

    /// Unit of sale, when the API expanded the product.
    pub fn unit(&self) -> Option<&str> {
        match self {
            OrderProduct::Id(_) => None,
            OrderProduct::Details(details) => details.unit.as_deref(),
        }
    }
}

/// Expanded product details on an order line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductDetails {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A recorded status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status entered
    pub status: OrderStatus,

    /// When it was entered
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

/// Sort key for the admin order listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSort {
    /// Field to sort on, e.g. `"createdAt"`
    pub field: String,

    /// Newest or largest first
    pub descending: bool,
}

impl OrderSort {
    /// Newest orders first.
    pub fn newest_first() -> Self {
        Self {
            field: "createdAt".to_string(),
            descending: true,
        }
    }

    /// Wire form, e.g. `"-createdAt"`.
    pub fn to_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Filters for the admin order listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<OrderSort>,
}

impl OrderQuery {
    /// Query string pairs, skipping unset and blank values.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }

        if let Some(search) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
        {
            pairs.push(("search", search.to_string()));
        }

        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }

        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }

        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.to_param()));
        }

        pairs
    }
}

/// One page of the admin order listing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    /// Orders on this page
    pub orders: Vec<Order>,

    /// Number of orders matching the query across all pages
    pub total: u64,
}

impl OrderPage {
    /// Number of pages needed at the given page size.
    pub fn page_count(&self, per_page: u32) -> u64 {
        match u64::from(per_page) {
            0 => 0,
            per_page => self.total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const PLACED: &str = r#"{
        "_id": "665f1c2a9b",
        "customerName": "Asha",
        "phone": "9876543210",
        "items": [
            {"product": {"_id": "p1", "name": "Milk", "unit": "ltr"}, "quantity": 2, "price": 50},
            {"product": "p2", "quantity": 1, "price": "35.50"}
        ],
        "subtotal": 135.5,
        "totalAmount": 135.5,
        "status": "preparing",
        "statusHistory": [{"status": "pending", "timestamp": "2026-10-18T08:30:00Z"}],
        "createdAt": "2026-10-18T08:30:00.000Z"
    }"#;

    #[test]
    fn reads_placed_orders() -> TestResult {
        let order: Order = serde_json::from_str(PLACED)?;

        assert_eq!(order.id, "665f1c2a9b");
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.total_amount(), Decimal::new(1355, 1));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items.first().and_then(|line| line.product.name()), Some("Milk"));
        assert_eq!(
            order.items.get(1).map(|line| &line.product),
            Some(&OrderProduct::Id("p2".to_string()))
        );
        assert_eq!(order.status_history.len(), 1);

        Ok(())
    }

    #[test]
    fn cached_orders_read_back() -> TestResult {
        let order: Order = serde_json::from_str(PLACED)?;

        let reread: Order = serde_json::from_str(&serde_json::to_string(&order)?)?;

        assert_eq!(reread, order);

        Ok(())
    }

    #[test]
    fn total_falls_back_to_line_totals() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{"id":"o1","items":[{"productId":"p1","quantity":3,"unitPrice":20}]}"#,
        )?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount(), Decimal::from(60));

        Ok(())
    }

    #[test]
    fn recording_a_status_extends_the_history() -> TestResult {
        let mut order: Order = serde_json::from_str(PLACED)?;
        let at: Timestamp = "2026-10-18T09:00:00Z".parse()?;

        order.record_status(OrderStatus::Ready, at);

        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(
            order.status_history.last(),
            Some(&StatusChange {
                status: OrderStatus::Ready,
                timestamp: Some(at),
            })
        );

        Ok(())
    }

    #[test]
    fn submission_sends_numbers() -> TestResult {
        let order = NewOrder {
            customer_name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            items: vec![NewOrderLine {
                product_id: "p1".to_string(),
                quantity: 2,
                unit_price: Decimal::new(505, 1),
            }],
            subtotal: Decimal::from(101),
            total: Decimal::from(101),
            notes: Some("No special instructions".to_string()),
        };

        let json = serde_json::to_value(&order)?;

        assert_eq!(
            json,
            serde_json::json!({
                "customerName": "Asha",
                "phone": "9876543210",
                "items": [{"productId": "p1", "quantity": 2, "unitPrice": 50.5}],
                "subtotal": 101.0,
                "total": 101.0,
                "notes": "No special instructions"
            })
        );

        Ok(())
    }

    #[test]
    fn query_pairs() -> TestResult {
        let query = OrderQuery {
            status: Some(OrderStatus::Ready),
            search: Some(" ".to_string()),
            from: Some("2026-10-01".parse()?),
            page: Some(2),
            limit: Some(10),
            sort: Some(OrderSort::newest_first()),
            ..OrderQuery::default()
        };

        assert_eq!(
            query.to_pairs(),
            vec![
                ("status", "ready".to_string()),
                ("from", "2026-10-01".to_string()),
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
                ("sort", "-createdAt".to_string()),
            ]
        );

        Ok(())
    }

    #[test]
    fn page_count_rounds_up() {
        let page = OrderPage {
            orders: Vec::new(),
            total: 21,
        };

        assert_eq!(page.page_count(10), 3);
        assert_eq!(page.page_count(0), 0);
    }
}
