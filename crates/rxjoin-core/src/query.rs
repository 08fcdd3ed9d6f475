//! The question both strategies answer, and the strategies themselves.

use crate::{Error, Result};

// ─── Drug pair ───────────────────────────────────────────────────────────────

/// Two drug names that have been checked to be present, non-empty and
/// distinct. Names are compared exactly; no trimming or case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugPair {
  first:  String,
  second: String,
}

impl DrugPair {
  pub fn new(first: Option<String>, second: Option<String>) -> Result<Self> {
    let (Some(first), Some(second)) = (first, second) else {
      return Err(Error::MissingDrugName);
    };
    if first.is_empty() || second.is_empty() {
      return Err(Error::MissingDrugName);
    }
    if first == second {
      return Err(Error::SameDrugName(first));
    }
    Ok(Self { first, second })
  }

  pub fn first(&self) -> &str { &self.first }

  pub fn second(&self) -> &str { &self.second }

  /// The same pair with the names swapped.
  pub fn swapped(&self) -> Self {
    Self {
      first:  self.second.clone(),
      second: self.first.clone(),
    }
  }
}

// ─── Strategy ────────────────────────────────────────────────────────────────

/// The two interchangeable ways of finding patients on both drugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
  /// One declarative query; the store's planner does the join.
  StandardJoin,
  /// Sequential point lookups and an application-side set intersection.
  LookupAndExpand,
}

impl Strategy {
  /// Label reported in the `approach` field of the response.
  pub fn approach(self) -> &'static str {
    match self {
      Strategy::StandardJoin => "Standard JOIN",
      Strategy::LookupAndExpand => "Lookup & Expand",
    }
  }

  /// Human-readable summary of what was computed for `pair`.
  pub fn describe(self, pair: &DrugPair) -> String {
    let name = match self {
      Strategy::StandardJoin => "JOIN Padrão",
      Strategy::LookupAndExpand => "Busca & Expansão",
    };
    format!(
      "Resultado da consulta {name} para '{}' e '{}'",
      pair.first(),
      pair.second()
    )
  }
}
