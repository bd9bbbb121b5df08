//! Orders

pub mod models;
mod service;

pub use models::{
    NewOrder, NewOrderLine, Order, OrderLine, OrderPage, OrderProduct, OrderQuery, OrderSort,
    StatusChange,
};
pub use service::*;
