//! PostgreSQL connection pooling and query helpers

use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL connection configuration
#[derive(Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
    /// Upper bound for a single repository call
    pub query_timeout: Duration,
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/orders".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(5),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// Open a connection pool
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| {
            DomainError::storage_unavailable(format!("Failed to connect to PostgreSQL: {}", e))
        })
}

/// Run a repository call with an upper time bound.
///
/// A timeout surfaces as `StorageUnavailable`.
pub async fn bounded<T, F>(timeout: Duration, operation: &str, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::storage_unavailable(format!(
            "{} timed out after {}ms",
            operation,
            timeout.as_millis()
        ))),
    }
}

/// Map a driver error to a domain error
pub fn storage_error(operation: &str, error: sqlx::Error) -> DomainError {
    DomainError::storage_unavailable(format!("{}: {}", operation, error))
}

/// Whether the driver error is a violated unique constraint
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PostgresConfig::new("postgres://db/orders")
            .with_max_connections(4)
            .with_query_timeout(Duration::from_millis(250));

        assert_eq!(config.url, "postgres://db/orders");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.query_timeout, Duration::from_millis(250));
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_hides_url() {
        let config = PostgresConfig::new("postgres://user:secret@db/orders");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: Result<(), DomainError> = bounded(
            Duration::from_millis(10),
            "slow query",
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
        )
        .await;

        match result {
            Err(DomainError::StorageUnavailable { message }) => {
                assert!(message.contains("slow query timed out"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_passes_errors_through() {
        let result: Result<(), DomainError> =
            bounded(Duration::from_secs(1), "insert user", async {
                Err(storage_error("insert user", sqlx::Error::RowNotFound))
            })
            .await;

        assert!(matches!(result, Err(DomainError::StorageUnavailable { .. })));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
