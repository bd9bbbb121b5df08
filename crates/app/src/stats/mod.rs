//! Store statistics

pub mod models;
mod service;

pub use models::{
    Analytics, AnalyticsRange, DailyRevenue, DashboardStats, DayRevenue, InvalidRange,
    LowStockProduct, StatusCounts, TopProduct,
};
pub use service::*;
