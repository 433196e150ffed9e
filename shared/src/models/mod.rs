//! Domain Models
//!
//! One module per aggregate, each with its entity plus create/update
//! payload types. Status enums use SCREAMING_SNAKE_CASE on the wire to
//! match the row store's conventions.

pub mod customer;
pub mod order;
pub mod payment;
pub mod product;
pub mod report;

// Re-exports
pub use customer::{Customer, CustomerCreate, CustomerUpdate};
pub use order::{Order, OrderItem, OrderItemRequest, OrderStatus};
pub use payment::{Payment, PaymentStatus};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use report::{CustomerOrderCount, TopProduct};
