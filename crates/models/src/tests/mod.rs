use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use std::time::Duration;

use crate::db::{connect_with_config, DatabaseConfig};



/// Connect and migrate, or `None` when no database is configured for this run.
pub(crate) async fn test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: no DATABASE_URL (or SKIP_DB_TESTS set)");
        return None;
    }
    let mut cfg = DatabaseConfig::from_env();
    cfg.min_connections = 1;
    cfg.connect_timeout = Duration::from_secs(5);
    cfg.acquire_timeout = Duration::from_secs(5);
    let db = match connect_with_config(&cfg).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

/// Random well-formed id for fixtures.
pub(crate) fn fresh_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}
