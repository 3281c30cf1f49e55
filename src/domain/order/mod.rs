//! Order domain

mod entity;
mod repository;
mod validation;

pub use entity::{NewOrder, Order, OrderId, OrderPatch};
pub use repository::OrderRepository;
pub use validation::{validate_price, validate_product, validate_quantity, OrderValidationError};

#[cfg(test)]
pub use repository::MockOrderRepository;
