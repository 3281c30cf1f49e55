//! Storage infrastructure - connection pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{schema_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{bounded, connect, is_unique_violation, storage_error, PostgresConfig};
