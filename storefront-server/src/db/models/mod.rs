//! Database models
//!
//! Documents stored in the embedded database plus the request/response
//! shapes derived from them.

pub mod admin;
pub mod order;

pub use admin::AdminConfig;
pub use order::{
    Customer, Fulfillment, Order, OrderCreate, OrderItem, OrderItemCreate, OrderStats,
    OrderStatusUpdate, OrderType, PaymentInfo, PaymentMethod, items_subtotal,
};
