//! JSON API for rxjoin.
//!
//! Exposes an axum [`Router`] with one route per query strategy, backed by a
//! shared [`SqliteStore`]. Tracing layers and the listener are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rxjoin_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod queries;

use axum::{Router, routing::get};
use rxjoin_store_sqlite::SqliteStore;

pub use error::ApiError;
pub use queries::Envelope;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(store: SqliteStore) -> Router<()> {
  Router::new()
    .route("/join-padrao", get(queries::join_padrao))
    .route("/busca-expansao-join", get(queries::busca_expansao))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
