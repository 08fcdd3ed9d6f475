//! The pooled SQLite store shared by all request handlers.

use std::{str::FromStr, time::{Duration, Instant}};

use serde::Deserialize;
use sqlx::{
  Sqlite, SqlitePool,
  sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;

use crate::{
  Result,
  schema::{SCHEMA, statements},
  seed::SeedSession,
};

// ─── Pool configuration ──────────────────────────────────────────────────────

/// Sizing and timeouts of the connection pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
  /// Upper bound on concurrently open database sessions.
  pub max_connections:    u32,
  /// How long a request may wait for a free connection before failing.
  pub acquire_timeout_ms: u64,
  /// Idle connections are closed after this long.
  pub idle_timeout_ms:    u64,
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self {
      max_connections:    20,
      acquire_timeout_ms: 2_000,
      idle_timeout_ms:    30_000,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The rxjoin store, backed by a bounded SQLite connection pool.
///
/// Cloning is cheap; clones share the same pool. Connections are checked out
/// per query and returned when the query future completes or is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) pool: SqlitePool,
}

/// Row counts of the four tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableCounts {
  pub patients:     i64,
  pub drugs:        i64,
  pub associations: i64,
  pub interactions: i64,
}

impl SqliteStore {
  /// Connect to `url` (creating the file if needed) and ensure the schema
  /// exists.
  pub async fn open(url: &str, config: &PoolConfig) -> Result<Self> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
      .idle_timeout(Duration::from_millis(config.idle_timeout_ms))
      .connect_with(options)
      .await?;
    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  ///
  /// Every SQLite in-memory connection is its own database, so the pool is
  /// pinned to one connection that is never reaped.
  pub async fn open_in_memory() -> Result<Self> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;
    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    for stmt in statements(SCHEMA) {
      sqlx::query(stmt).execute(&self.pool).await?;
    }
    Ok(())
  }

  /// Start an all-or-nothing seeding transaction on a dedicated connection.
  pub async fn begin_seed(&self) -> Result<SeedSession> {
    let tx = self.pool.begin().await?;
    Ok(SeedSession::new(tx))
  }

  pub async fn table_counts(&self) -> Result<TableCounts> {
    let (patients, drugs, associations, interactions): (i64, i64, i64, i64) =
      sqlx::query_as(
        "SELECT
           (SELECT COUNT(*) FROM pacientes),
           (SELECT COUNT(*) FROM medicamentos),
           (SELECT COUNT(*) FROM paciente_medicamentos),
           (SELECT COUNT(*) FROM interacoes_medicamentosas)",
      )
      .fetch_one(&self.pool)
      .await?;
    Ok(TableCounts { patients, drugs, associations, interactions })
  }

  /// Close the pool, waiting for checked-out connections to be returned.
  pub async fn close(&self) { self.pool.close().await }
}

/// Emit the per-query trace line shared by every read.
pub(crate) fn log_query(query: &'static str, started: Instant, rows: usize) {
  debug!(
    query,
    elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0,
    rows,
    "query executed"
  );
}

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER` for 3.32 and later.
pub(crate) const MAX_BIND_PARAMS: usize = 32_766;

pub(crate) type Builder<'a> = sqlx::QueryBuilder<'a, Sqlite>;
