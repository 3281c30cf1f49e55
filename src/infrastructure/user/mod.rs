//! User infrastructure: credential store implementations and service

mod postgres_repository;
pub mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserService;
