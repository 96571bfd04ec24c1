//! Roster - user management REST backend

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{BootstrapAdminConfig, Config, LoggingConfig};
use roster_api::{AppState, create_router};
use roster_auth::{JwtManager, hash_password};
use roster_db::{Database, NewUser, UserRole};

/// Roster - user management REST backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "ROSTER_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "ROSTER_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "TOKEN_SIGN_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(&config.logging);

    info!("Starting Roster v{}", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!(
            "Config file not found at {}, using defaults and environment",
            args.config
        ),
    }

    config.validate()?;

    if let Some(path) = config.database.sqlite_file()
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create database directory {:?}", parent))?;
    }

    let db = Database::new(&config.database.url, config.database.max_connections).await?;

    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(&db, admin, config.auth.hash_cost).await?;
    }

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let jwt = Arc::new(JwtManager::new(&config.auth.jwt_secret));
    let state = AppState::new(db, jwt, config.auth.hash_cost);
    let app = create_router(state, Some(Arc::new(metrics_handle)));

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured admin account unless its email is already taken
async fn ensure_admin(db: &Database, admin: &BootstrapAdminConfig, hash_cost: u32) -> Result<()> {
    if db.get_user_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    info!("Creating bootstrap admin user: {}", admin.email);
    let password_hash = hash_password(&admin.password, hash_cost)?;
    db.insert_user(NewUser {
        email: admin.email.clone(),
        password_hash,
        role: UserRole::Admin,
    })
    .await?;
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
