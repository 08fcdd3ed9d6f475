//! HTTP server assembly for rxjoin.
//!
//! Loads [`ServerConfig`] and composes the root banner, the `/api` strategy
//! routes and request tracing into one axum [`Router`].

use std::path::Path;

use axum::{Router, routing::get};
use rxjoin_store_sqlite::{PoolConfig, SqliteStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file given
/// with `--config`, then `RXJOIN_*` environment variables. Nested keys use a
/// double underscore, e.g. `RXJOIN_POOL__MAX_CONNECTIONS=40`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub database_url: String,
  #[serde(default)]
  pub pool:         PoolConfig,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("database_url", "sqlite://rxjoin.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RXJOIN")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

const BANNER: &str =
  "rxjoin: pacientes em uso de duas drogas que interagem.\n\
   GET /api/join-padrao?droga1=..&droga2=..\n\
   GET /api/busca-expansao-join?droga1=..&droga2=..\n";

async fn banner() -> &'static str { BANNER }

/// Build the full application router around `store`.
pub fn app(store: SqliteStore) -> Router {
  Router::new()
    .route("/", get(banner))
    .nest("/api", rxjoin_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
