//! SQLite backend for rxjoin.
//!
//! Owns the bounded [`sqlx`] connection pool, the schema, the read queries
//! behind both query strategies, and the transactional write path used by
//! the seeder.

mod query;
mod schema;
mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::{Insert, SeedSession};
pub use store::{PoolConfig, SqliteStore, TableCounts};

#[cfg(test)]
mod tests;
