//! Handlers for the two strategy endpoints.
//!
//! | Method | Path | Strategy |
//! |--------|------|----------|
//! | `GET`  | `/join-padrao?droga1=..&droga2=..` | [`Strategy::StandardJoin`] |
//! | `GET`  | `/busca-expansao-join?droga1=..&droga2=..` | [`Strategy::LookupAndExpand`] |
//!
//! Both respond with the same [`Envelope`]; an empty `data` array is a
//! successful outcome, not an error.

use std::time::Instant;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use rxjoin_core::{
  patient::Patient,
  query::{DrugPair, Strategy},
};
use rxjoin_store_sqlite::SqliteStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;

// ─── Request / response shapes ────────────────────────────────────────────────

/// Raw query parameters; presence and content are checked by [`DrugPair`].
#[derive(Debug, Deserialize)]
pub struct DrugParams {
  pub droga1: Option<String>,
  pub droga2: Option<String>,
}

/// Uniform success body of both endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
  pub description:       String,
  pub approach:          String,
  /// Wall-clock time spent in the strategy, rounded to two decimals.
  pub tempo_execucao_ms: f64,
  pub row_count:         usize,
  pub data:              Vec<Patient>,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `GET /join-padrao`
pub async fn join_padrao(
  State(store): State<SqliteStore>,
  params: Result<Query<DrugParams>, QueryRejection>,
) -> Result<Json<Envelope>, ApiError> {
  run(&store, Strategy::StandardJoin, params).await
}

/// `GET /busca-expansao-join`
pub async fn busca_expansao(
  State(store): State<SqliteStore>,
  params: Result<Query<DrugParams>, QueryRejection>,
) -> Result<Json<Envelope>, ApiError> {
  run(&store, Strategy::LookupAndExpand, params).await
}

async fn run(
  store: &SqliteStore,
  strategy: Strategy,
  params: Result<Query<DrugParams>, QueryRejection>,
) -> Result<Json<Envelope>, ApiError> {
  let Query(params) = params.map_err(|_| ApiError::malformed_query())?;
  let pair = DrugPair::new(params.droga1, params.droga2)?;

  info!(
    approach = strategy.approach(),
    droga1 = pair.first(),
    droga2 = pair.second(),
    "running query"
  );
  let started = Instant::now();
  let data = match strategy {
    Strategy::StandardJoin => store.standard_join(&pair).await,
    Strategy::LookupAndExpand => store.lookup_and_expand(&pair).await,
  }
  .map_err(|source| ApiError::Store { strategy, source })?;
  let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;

  Ok(Json(Envelope {
    description:       strategy.describe(&pair),
    approach:          strategy.approach().to_owned(),
    tempo_execucao_ms: round_to_hundredths(elapsed_ms),
    row_count:         data.len(),
    data,
  }))
}

fn round_to_hundredths(ms: f64) -> f64 { (ms * 100.0).round() / 100.0 }
