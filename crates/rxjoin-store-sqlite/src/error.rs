//! Error type for `rxjoin-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rxjoin_core::Error),

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl Error {
  /// `true` when the store rejected a write because it would duplicate a
  /// UNIQUE or PRIMARY KEY value.
  pub fn is_unique_violation(&self) -> bool {
    match self {
      Error::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
