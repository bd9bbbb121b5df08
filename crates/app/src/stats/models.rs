//! Stats Models

use jiff::{ToSpan, civil::Date};
use rust_decimal::Decimal;
use serde::Deserialize;
use storefront::orders::OrderStatus;
use thiserror::Error;

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_products: u64,
    pub total_revenue: Decimal,
    pub pending_orders: u64,
    pub status_distribution: StatusCounts,
    pub low_stock_products: Vec<LowStockProduct>,
    pub top_selling_products: Vec<TopProduct>,

    /// Revenue change against the previous period, in percent
    pub revenue_trend: Decimal,

    /// Order count change against the previous period, in percent
    pub orders_trend: Decimal,
}

/// Sales figures over a date range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analytics {
    pub order_count: u64,
    pub order_growth: Decimal,
    pub total_revenue: Decimal,
    pub revenue_growth: Decimal,
    pub average_order_value: Decimal,
    pub aov_growth: Decimal,
    pub completion_rate: Decimal,
    pub completion_rate_growth: Decimal,
    pub daily_revenue: Option<DailyRevenue>,
    pub status_distribution: StatusCounts,
    pub top_products: Vec<TopProduct>,
}

/// Order counts per status, with optional shares in percent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: u64,
    pub preparing: u64,
    pub ready: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub pending_percentage: Option<Decimal>,
    pub preparing_percentage: Option<Decimal>,
    pub ready_percentage: Option<Decimal>,
    pub completed_percentage: Option<Decimal>,
    pub cancelled_percentage: Option<Decimal>,
}

impl StatusCounts {
    /// Orders in the given status. Unknown statuses count as zero.
    pub fn count(&self, status: &OrderStatus) -> u64 {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Preparing => self.preparing,
            OrderStatus::Ready => self.ready,
            OrderStatus::Completed => self.completed,
            OrderStatus::Cancelled => self.cancelled,
            OrderStatus::Other(_) => 0,
        }
    }

    /// Share of orders in the given status, in percent.
    ///
    /// Uses the share reported by the API, or derives it from the counts.
    pub fn percentage(&self, status: &OrderStatus) -> Decimal {
        let reported = match status {
            OrderStatus::Pending => self.pending_percentage,
            OrderStatus::Preparing => self.preparing_percentage,
            OrderStatus::Ready => self.ready_percentage,
            OrderStatus::Completed => self.completed_percentage,
            OrderStatus::Cancelled => self.cancelled_percentage,
            OrderStatus::Other(_) => None,
        };

        reported.unwrap_or_else(|| match self.total() {
            0 => Decimal::ZERO,
            total => {
                (Decimal::from(self.count(status)) * Decimal::ONE_HUNDRED / Decimal::from(total))
                    .round_dp(1)
            }
        })
    }

    /// Orders across all known statuses.
    pub fn total(&self) -> u64 {
        self.pending + self.preparing + self.ready + self.completed + self.cancelled
    }
}

/// A product running out of stock.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LowStockProduct {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub stock: i64,
    pub unit: Option<String>,
}

/// A best-selling product.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopProduct {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,

    #[serde(alias = "totalQuantity")]
    pub total_sold: u64,

    #[serde(alias = "totalRevenue")]
    pub revenue: Decimal,

    pub unit: Option<String>,
}

/// Best and worst days in an analytics range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyRevenue {
    pub highest_day: Option<DayRevenue>,
    pub lowest_day: Option<DayRevenue>,
}

/// Revenue on a single day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DayRevenue {
    pub date: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("range starts on {from} but ends on {to}")]
pub struct InvalidRange {
    pub from: Date,
    pub to: Date,
}

/// Inclusive date range for analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsRange {
    from: Date,
    to: Date,
}

impl AnalyticsRange {
    /// Days shown when no range is chosen.
    pub const DEFAULT_DAYS: i64 = 30;

    /// # Errors
    ///
    /// Returns an error when `from` is after `to`.
    pub fn new(from: Date, to: Date) -> Result<Self, InvalidRange> {
        if from > to {
            return Err(InvalidRange { from, to });
        }

        Ok(Self { from, to })
    }

    /// The `days` days up to and including `today`.
    pub fn ending(today: Date, days: i64) -> Self {
        let from = today.checked_sub(days.days()).unwrap_or(Date::MIN);

        Self { from, to: today }
    }

    /// First day of the range.
    pub fn start(&self) -> Date {
        self.from
    }

    /// Last day of the range.
    pub fn end(&self) -> Date {
        self.to
    }

    /// Query string pairs.
    pub fn to_pairs(&self) -> [(&'static str, String); 2] {
        [("from", self.from.to_string()), ("to", self.to.to_string())]
    }
}
