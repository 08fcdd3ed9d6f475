//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rxjoin_core::query::Strategy;
use serde_json::json;
use thiserror::Error;

const MISSING_PARAMS: &str = "Parâmetros droga1 e droga2 (strings) são obrigatórios.";
const SAME_DRUG: &str = "Os nomes das drogas devem ser diferentes.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// A store failure while running `strategy`.
  #[error("store error: {source}")]
  Store {
    strategy: Strategy,
    #[source]
    source:   rxjoin_store_sqlite::Error,
  },
}

impl From<rxjoin_core::Error> for ApiError {
  fn from(e: rxjoin_core::Error) -> Self {
    let message = match e {
      rxjoin_core::Error::SameDrugName(_) => SAME_DRUG,
      _ => MISSING_PARAMS,
    };
    ApiError::BadRequest(message.to_owned())
  }
}

impl ApiError {
  /// The query string could not be parsed at all.
  pub fn malformed_query() -> Self { ApiError::BadRequest(MISSING_PARAMS.to_owned()) }
}

fn internal_message(strategy: Strategy) -> &'static str {
  match strategy {
    Strategy::StandardJoin => {
      "Erro interno do servidor ao processar a consulta padrão."
    }
    Strategy::LookupAndExpand => {
      "Erro interno inesperado do servidor ao processar a consulta busca & expansão."
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Store { strategy, source } => {
        tracing::error!(approach = strategy.approach(), error = %source, "query failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({
            "error":   internal_message(strategy),
            "details": source.to_string(),
          })),
        )
          .into_response()
      }
    }
  }
}
