use std::{env, net::SocketAddr};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::admin_http::spawn_admin_server;
use common::metrics::encode_metrics;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use models::db::{connect_with_config, test_connection, DatabaseConfig};
use service::identifier::IdGenerator;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file when present, otherwise defaults plus `SERVER_HOST` / `SERVER_PORT`.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unusable; falling back to environment");
            let mut cfg = AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.normalize_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            Ok(cfg)
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Public entry: connect, migrate, and serve the `/v1` API until the listener fails.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;

    let db = connect_with_config(&DatabaseConfig::from(&cfg.database))
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if !test_connection(&db).await {
        return Err(StartupError::Database("SELECT 1 failed".into()).into());
    }
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    if let Some(admin) = cfg.server.admin_addr.as_deref() {
        spawn_admin_server(admin, encode_metrics);
    }

    let state = AppState::from_db(db, IdGenerator::new(cfg.ids.max_attempts));
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "mentorship api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
