//! Patient rows as returned by both query strategies.

use serde::{Deserialize, Serialize};

pub type PatientId = i64;

/// A patient as exposed over the API: identity plus display name.
///
/// Field names match the `pacientes` table and the JSON wire format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patient {
  pub id:   PatientId,
  pub nome: String,
}
