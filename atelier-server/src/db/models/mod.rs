//! Domain Models

pub mod admin;
pub mod order;
pub mod product;

pub use admin::Admin;
pub use order::{
    CustomerInfo, Order, OrderCreate, OrderItem, OrderItemCreate, OrderItemInsert, OrderStatus,
    OrderStatusUpdate,
};
pub use product::{Product, ProductCreate, ProductUpdate};

pub(crate) fn default_true() -> bool {
    true
}
