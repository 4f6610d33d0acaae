use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use devconnect::auth::TokenKeys;
use devconnect::config::{Cli, Config};
use devconnect::state::AppState;
use devconnect::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let db_path = config
        .db_path()
        .ok_or_else(|| anyhow::anyhow!("database path not configured"))?;
    let pool = db::create_pool(db_path)?;
    db::run_migrations(&pool)?;

    let ttl = config.auth.token_ttl_secs;
    let keys = match config.auth.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => TokenKeys::from_secret(secret.as_bytes(), ttl),
        _ => {
            tracing::warn!(
                "No auth.jwt_secret configured; using a random secret, tokens will not survive a restart"
            );
            TokenKeys::generate(ttl)
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState::new(pool, config, keys));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
