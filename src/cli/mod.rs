//! CLI module for the orders API
//!
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply or revert the database schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::LoggingConfig;

/// Orders API - user and order management with JWT authentication
#[derive(Parser)]
#[command(name = "orders-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Manage the database schema
    Migrate(migrate::MigrateArgs),
}

fn logging_config(config: &AppConfig) -> LoggingConfig {
    LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    }
}
