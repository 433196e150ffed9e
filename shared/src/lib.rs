//! Shared types for the tally back-office tool
//!
//! Domain models used across the store gateway and the CLI:
//! products, customers, orders, payments and report rows.

pub mod models;

// Re-exports
pub use models::{
    Customer, CustomerCreate, CustomerUpdate, CustomerOrderCount, Order, OrderItem,
    OrderItemRequest, OrderStatus, Payment, PaymentStatus, Product, ProductCreate, ProductUpdate,
    TopProduct,
};
pub use serde::{Deserialize, Serialize};
