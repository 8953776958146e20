#![cfg(test)]
use std::time::Duration;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::{connect_with_config, DatabaseConfig};

// Migrations run once per test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout = Duration::from_secs(5);
    cfg.acquire_timeout = Duration::from_secs(10);
    cfg
}

/// A migrated connection, or `None` when this run has no database.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&config()).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    // fresh connection for the current test's runtime
    Ok(Some(connect_with_config(&config()).await?))
}
