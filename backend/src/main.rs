//! Postboard entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use postboard::inbound::http::health::HealthState;
use postboard::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use postboard::outbound::security::BuildMode;
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let mut config = ServerConfig::from_settings(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid server settings")?;

    if let Some(database_url) = settings.database_url.as_deref() {
        run_migrations(database_url)
            .await
            .wrap_err("failed to migrate database")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    info!(addr = %config.bind_addr(), "starting postboard");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated abnormally")
}
