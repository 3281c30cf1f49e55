//! Orders API
//!
//! User and order management over HTTP with JWT authentication:
//! - Registration and login with Argon2 password hashing
//! - Bearer token identity gate on every protected route
//! - Self-only profile management and owner-scoped orders
//! - Postgres or in-memory credential store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::StorageBackend;
use domain::order::OrderRepository;
use domain::user::UserRepository;
use infrastructure::auth::{Argon2Hasher, AuthService, JwtService};
use infrastructure::order::{InMemoryOrderRepository, OrderService, PostgresOrderRepository};
use infrastructure::storage::{self, Migrator, PostgresMigrator};
use infrastructure::user::{InMemoryUserRepository, PostgresUserRepository, UserService};
use tracing::info;

/// Create application state from configuration
///
/// Connects to Postgres (and applies pending migrations when enabled) unless
/// the in-memory backend is selected.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let jwt_service = Arc::new(JwtService::new(config.auth.to_jwt_config()));

    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage backend");
            Ok(create_in_memory_state(jwt_service))
        }
        StorageBackend::Postgres => {
            info!("Using PostgreSQL storage backend");

            let pool = storage::connect(&config.database.to_postgres_config()).await?;

            if config.database.run_migrations {
                PostgresMigrator::new(pool.clone()).run().await?;
            }

            let query_timeout = config.database.query_timeout();
            let users = Arc::new(PostgresUserRepository::new(pool.clone(), query_timeout));
            let orders = Arc::new(PostgresOrderRepository::new(pool, query_timeout));

            Ok(build_state(users, orders, jwt_service))
        }
    }
}

/// Create application state backed by in-memory repositories
pub fn create_in_memory_state(jwt_service: Arc<JwtService>) -> AppState {
    build_state(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryOrderRepository::new()),
        jwt_service,
    )
}

fn build_state<U, O>(users: Arc<U>, orders: Arc<O>, jwt_service: Arc<JwtService>) -> AppState
where
    U: UserRepository + 'static,
    O: OrderRepository + 'static,
{
    let hasher = Arc::new(Argon2Hasher::new());

    let auth_service = AuthService::new(users.clone(), hasher.clone(), jwt_service.clone());
    let user_service = UserService::new(users.clone(), hasher);
    let order_service = OrderService::new(orders, users);

    AppState {
        auth_service: Arc::new(auth_service),
        user_service: Arc::new(user_service),
        order_service: Arc::new(order_service),
        jwt_service,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::MAX_TOKEN_TTL_HOURS;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.auth.jwt_secret = "state-secret".to_string();
        config
    }

    #[tokio::test]
    async fn test_state_from_memory_config() {
        let state = create_app_state_with_config(&memory_config()).await.unwrap();

        assert_eq!(state.user_service.count_active().await.unwrap(), 0);

        let issued = state
            .jwt_service
            .issue_default(domain::user::UserId::new(1))
            .unwrap();
        assert!(state.jwt_service.verify(&issued.token).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_config_builds_no_state() {
        let mut config = memory_config();
        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS + 1;
        assert!(create_app_state_with_config(&config).await.is_err());

        let mut config = memory_config();
        config.auth.jwt_secret.clear();
        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
