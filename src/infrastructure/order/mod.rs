//! Order infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresOrderRepository;
pub use repository::InMemoryOrderRepository;
pub use service::{CreateOrderRequest, OrderService};
