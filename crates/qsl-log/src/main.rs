//! QSL Log - amateur radio contact logbook server

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use qsl_api::{AppState, create_router};
use qsl_auth::{AuthService, PasswordHasher, SessionCookie, TokenIssuer};
use qsl_db::Database;

/// QSL Log - amateur radio contact logbook server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "QSL_LOG_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "QSL_LOG_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting QSL Log v{}", env!("CARGO_PKG_VERSION"));

    for name in config.auth.default_secrets() {
        warn!("{} is set to its built-in default; change it before going to production", name);
    }

    // Create data directory
    if let Some(parent) = config.database.file_path().and_then(|p| p.parent()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // Initialize database
    let db = Database::new(&config.database.url, config.database.max_connections).await?;

    // Initialize auth
    let hasher = PasswordHasher::new(
        config.auth.hash_memory_kib,
        config.auth.hash_iterations,
        config.auth.hash_parallelism,
    )?;
    let auth = AuthService::new(Arc::new(db.clone()), hasher);
    let tokens = Arc::new(TokenIssuer::new(
        &config.auth.jwt_secret,
        Duration::from_secs(config.auth.token_duration_secs),
    ));
    let cookie = Arc::new(SessionCookie::new(
        &config.auth.cookie_name,
        &config.auth.cookie_secret,
        config.auth.token_duration_secs,
        config.auth.secure_cookies,
    ));

    // Create application state
    let state = AppState::new(db, auth, tokens, cookie);

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind_addr, port))?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

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
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
