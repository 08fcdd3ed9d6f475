//! Error types for `rxjoin-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// One or both drug names were absent or empty.
  #[error("both drug names are required")]
  MissingDrugName,

  #[error("drug names must differ: {0:?}")]
  SameDrugName(String),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
