use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::auth::{JwtConfig, MAX_TOKEN_TTL_HOURS};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Where accounts and orders are kept
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub query_timeout_ms: u64,
    pub run_migrations: bool,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Required; there is no default.
    pub jwt_secret: String,
    pub token_ttl_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_ms: 5_000,
            query_timeout_ms: 5_000,
            run_migrations: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 24,
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn to_postgres_config(&self) -> PostgresConfig {
        PostgresConfig::new(self.url.clone())
            .with_max_connections(self.max_connections)
            .with_acquire_timeout(Duration::from_millis(self.acquire_timeout_ms))
            .with_query_timeout(Duration::from_millis(self.query_timeout_ms))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl AuthConfig {
    pub fn to_jwt_config(&self) -> JwtConfig {
        JwtConfig::new(self.jwt_secret.clone(), self.token_ttl_hours)
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, then `APP__SECTION__KEY`
    /// variables. `DATABASE_URL` and `JWT_SECRET` fill in when unset.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_fallbacks(|key| std::env::var(key).ok());

        Ok(config)
    }

    fn apply_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.database.url.is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }

        if self.auth.jwt_secret.is_empty() {
            if let Some(secret) = lookup("JWT_SECRET") {
                self.auth.jwt_secret = secret;
            }
        }
    }

    /// Startup checks; any failure here must stop the process
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(DomainError::configuration(
                "JWT secret is not set (auth.jwt_secret or JWT_SECRET)",
            ));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            return Err(DomainError::configuration(format!(
                "auth.token_ttl_hours must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(DomainError::configuration(
                "Database URL is not set (database.url or DATABASE_URL)",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.query_timeout(), Duration::from_secs(5));
        assert!(config.database.run_migrations);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let mut config = valid_config();
        config.auth.jwt_secret = "  ".to_string();

        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut config = valid_config();

        for hours in [0, MAX_TOKEN_TTL_HOURS + 1, u64::MAX] {
            config.auth.token_ttl_hours = hours;
            assert!(
                matches!(config.validate(), Err(DomainError::Configuration { .. })),
                "{}",
                hours
            );
        }

        for hours in [1, 24, MAX_TOKEN_TTL_HOURS] {
            config.auth.token_ttl_hours = hours;
            assert!(config.validate().is_ok(), "{}", hours);
        }
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = valid_config();
        config.storage.backend = StorageBackend::Postgres;
        assert!(config.validate().is_err());

        config.database.url = "postgres://localhost/orders".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallbacks_fill_only_unset_values() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "from-config".to_string();

        config.apply_fallbacks(|key| match key {
            "DATABASE_URL" => Some("postgres://env/orders".to_string()),
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(config.database.url, "postgres://env/orders");
        assert_eq!(config.auth.jwt_secret, "from-config");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = valid_config();
        config.auth.jwt_secret = "super-secret-value".to_string();
        config.database.url = "postgres://user:hunter2@db/orders".to_string();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_str(
            r#"{"storage": {"backend": "memory"}, "auth": {"jwt_secret": "s"}, "logging": {"level": "debug", "format": "json"}}"#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 8080);
    }
}
