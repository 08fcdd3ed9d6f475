//! Drugs and the interactions between them.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{Error, Result};

pub type DrugId = i64;

/// Longest drug name the `medicamentos` table accepts.
pub const MAX_DRUG_NAME_LEN: usize = 100;

/// A drug: identity plus unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
  pub id:   DrugId,
  pub nome: String,
}

// ─── Severity ────────────────────────────────────────────────────────────────

/// Clinical severity of an interaction, stored verbatim in `severidade`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  VariantArray,
)]
pub enum Severity {
  Leve,
  Moderada,
  Grave,
}

impl Severity {
  /// Parse the stored form, keeping the rejected text in the error.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSeverity(s.to_owned()))
  }
}

// ─── Interaction pair ────────────────────────────────────────────────────────

/// An unordered pair of drug ids, stored with the lower id first.
///
/// Two pairs built from the same ids in either order compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionPair {
  low:  DrugId,
  high: DrugId,
}

impl InteractionPair {
  /// Canonicalise `(a, b)`. A drug never interacts with itself, so equal ids
  /// yield `None`.
  pub fn new(a: DrugId, b: DrugId) -> Option<Self> {
    match a.cmp(&b) {
      std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
      std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
      std::cmp::Ordering::Equal => None,
    }
  }

  pub fn low(&self) -> DrugId { self.low }

  pub fn high(&self) -> DrugId { self.high }
}

impl fmt::Display for InteractionPair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.low, self.high)
  }
}

/// A stored interaction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
  pub pair:      InteractionPair,
  pub severity:  Severity,
  pub descricao: String,
}
