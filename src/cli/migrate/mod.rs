//! Migrate command - applies the embedded schema and exits

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{self, Migrator, PostgresMigrator};

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long, conflicts_with = "status")]
    pub revert: bool,

    /// Print the current schema version
    #[arg(long)]
    pub status: bool,
}

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&super::logging_config(&config));

    if config.database.url.is_empty() {
        anyhow::bail!("database.url (or DATABASE_URL) must be set to run migrations");
    }

    let pool = storage::connect(&config.database.to_postgres_config()).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.status {
        match migrator.version().await? {
            Some(version) => info!("Schema is at version {}", version),
            None => info!("No migrations applied"),
        }
    } else if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    Ok(())
}
