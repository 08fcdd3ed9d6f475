//! rxjoin HTTP server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `RXJOIN_*`
//! environment variables, opens the pooled SQLite store, and serves the two
//! query strategies over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rxjoin_server::ServerConfig;
use rxjoin_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "rxjoin query-strategy server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store = SqliteStore::open(&cfg.database_url, &cfg.pool)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.database_url))?;
  tracing::info!(
    database_url = %cfg.database_url,
    max_connections = cfg.pool.max_connections,
    acquire_timeout_ms = cfg.pool.acquire_timeout_ms,
    idle_timeout_ms = cfg.pool.idle_timeout_ms,
    "connection pool ready"
  );

  let app = rxjoin_server::app(store.clone());
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await;
  tracing::info!("connection pool closed");
  Ok(())
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolve so
/// the server keeps running.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}
