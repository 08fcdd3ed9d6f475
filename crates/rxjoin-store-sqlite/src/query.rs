//! Read queries behind the two strategies.
//!
//! [`SqliteStore::standard_join`] hands the whole question to SQLite's
//! planner. [`SqliteStore::lookup_and_expand`] answers it with point lookups
//! and an application-side intersection of patient-id sets.

use std::{collections::HashSet, time::Instant};

use rxjoin_core::{
  drug::{Drug, DrugId, Interaction, InteractionPair, Severity},
  intersect::intersect_smaller_first,
  patient::{Patient, PatientId},
  query::DrugPair,
};
use tracing::{debug, info};

use crate::{
  Result,
  store::{Builder, MAX_BIND_PARAMS, SqliteStore, log_query},
};

const STANDARD_JOIN_SQL: &str = "
SELECT DISTINCT p.id, p.nome
FROM pacientes p
    JOIN paciente_medicamentos pm1 ON p.id = pm1.paciente_id
    JOIN medicamentos m1           ON pm1.medicamento_id = m1.id AND m1.nome = ?
    JOIN paciente_medicamentos pm2 ON p.id = pm2.paciente_id
    JOIN medicamentos m2           ON pm2.medicamento_id = m2.id AND m2.nome = ?
    JOIN interacoes_medicamentosas mi
         ON (mi.med1_id = m1.id AND mi.med2_id = m2.id)
         OR (mi.med1_id = m2.id AND mi.med2_id = m1.id)
WHERE m1.id <> m2.id
ORDER BY p.id
";

impl SqliteStore {
  // ── Standard join ─────────────────────────────────────────────────────────

  /// Patients taking both drugs of an interacting pair, in one query.
  pub async fn standard_join(&self, pair: &DrugPair) -> Result<Vec<Patient>> {
    let started = Instant::now();
    let rows: Vec<(PatientId, String)> = sqlx::query_as(STANDARD_JOIN_SQL)
      .bind(pair.first())
      .bind(pair.second())
      .fetch_all(&self.pool)
      .await?;
    log_query("standard_join", started, rows.len());
    Ok(rows.into_iter().map(|(id, nome)| Patient { id, nome }).collect())
  }

  // ── Lookup & expand ───────────────────────────────────────────────────────

  /// Patients taking both drugs of an interacting pair, computed from
  /// sequential lookups and a set intersection.
  ///
  /// Unknown drugs, non-interacting drugs and disjoint patient sets all yield
  /// an empty result rather than an error.
  pub async fn lookup_and_expand(&self, pair: &DrugPair) -> Result<Vec<Patient>> {
    let (first, second) = pair_ids(pair, self.resolve_drugs(pair).await?);
    let (Some(first), Some(second)) = (first, second) else {
      info!(
        droga1 = pair.first(),
        droga2 = pair.second(),
        "one or both drugs not found"
      );
      return Ok(Vec::new());
    };
    debug!(droga1 = first, droga2 = second, "drug ids resolved");

    let Some(interaction) = InteractionPair::new(first, second) else {
      return Ok(Vec::new());
    };
    if !self.interaction_exists(interaction).await? {
      info!(pair = %interaction, "drugs do not interact");
      return Ok(Vec::new());
    }

    let on_first = self.patients_on_drug(first).await?;
    debug!(drug = first, patients = on_first.len(), "patients on first drug");
    if on_first.is_empty() {
      return Ok(Vec::new());
    }

    let on_second = self.patients_on_drug(second).await?;
    debug!(drug = second, patients = on_second.len(), "patients on second drug");

    let shared = intersect_smaller_first(&on_first, &on_second);
    debug!(patients = shared.len(), "intersection computed");
    if shared.is_empty() {
      return Ok(Vec::new());
    }

    self.patients_by_id(&shared).await
  }

  /// Resolve both names in one fetch. Returns however many drugs exist.
  pub async fn resolve_drugs(&self, pair: &DrugPair) -> Result<Vec<Drug>> {
    let started = Instant::now();
    let rows: Vec<(DrugId, String)> =
      sqlx::query_as("SELECT id, nome FROM medicamentos WHERE nome = ? OR nome = ?")
        .bind(pair.first())
        .bind(pair.second())
        .fetch_all(&self.pool)
        .await?;
    log_query("resolve_drugs", started, rows.len());
    Ok(rows.into_iter().map(|(id, nome)| Drug { id, nome }).collect())
  }

  pub async fn interaction_exists(&self, pair: InteractionPair) -> Result<bool> {
    let started = Instant::now();
    let found: Option<i64> = sqlx::query_scalar(
      "SELECT 1 FROM interacoes_medicamentosas WHERE med1_id = ? AND med2_id = ? LIMIT 1",
    )
    .bind(pair.low())
    .bind(pair.high())
    .fetch_optional(&self.pool)
    .await?;
    log_query("interaction_exists", started, usize::from(found.is_some()));
    Ok(found.is_some())
  }

  /// Every patient holding `drug`.
  pub async fn patients_on_drug(&self, drug: DrugId) -> Result<HashSet<PatientId>> {
    let started = Instant::now();
    let ids: Vec<PatientId> = sqlx::query_scalar(
      "SELECT paciente_id FROM paciente_medicamentos WHERE medicamento_id = ?",
    )
    .bind(drug)
    .fetch_all(&self.pool)
    .await?;
    log_query("patients_on_drug", started, ids.len());
    Ok(ids.into_iter().collect())
  }

  /// Names for exactly `ids`, ordered by id. The id list is split so no
  /// statement exceeds SQLite's bind limit.
  pub async fn patients_by_id(&self, ids: &[PatientId]) -> Result<Vec<Patient>> {
    let started = Instant::now();
    let mut patients = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(MAX_BIND_PARAMS) {
      let mut builder = Builder::new("SELECT id, nome FROM pacientes WHERE id IN (");
      let mut list = builder.separated(", ");
      for id in chunk {
        list.push_bind(*id);
      }
      list.push_unseparated(")");
      let rows: Vec<(PatientId, String)> =
        builder.build_query_as().fetch_all(&self.pool).await?;
      patients.extend(rows.into_iter().map(|(id, nome)| Patient { id, nome }));
    }
    patients.sort_unstable_by_key(|p| p.id);
    log_query("patients_by_id", started, patients.len());
    Ok(patients)
  }

  // ── Inspection ────────────────────────────────────────────────────────────

  pub async fn drug_by_name(&self, nome: &str) -> Result<Option<Drug>> {
    let row: Option<(DrugId, String)> =
      sqlx::query_as("SELECT id, nome FROM medicamentos WHERE nome = ?")
        .bind(nome)
        .fetch_optional(&self.pool)
        .await?;
    Ok(row.map(|(id, nome)| Drug { id, nome }))
  }

  pub async fn interaction(&self, pair: InteractionPair) -> Result<Option<Interaction>> {
    let row: Option<(String, Option<String>)> = sqlx::query_as(
      "SELECT severidade, descricao FROM interacoes_medicamentosas
       WHERE med1_id = ? AND med2_id = ?",
    )
    .bind(pair.low())
    .bind(pair.high())
    .fetch_optional(&self.pool)
    .await?;
    row
      .map(|(severidade, descricao)| -> Result<Interaction> {
        Ok(Interaction {
          pair,
          severity: Severity::parse(&severidade)?,
          descricao: descricao.unwrap_or_default(),
        })
      })
      .transpose()
  }

  /// Drug ids held by one patient, ascending.
  pub async fn drugs_of_patient(&self, patient: PatientId) -> Result<Vec<DrugId>> {
    let ids = sqlx::query_scalar(
      "SELECT medicamento_id FROM paciente_medicamentos
       WHERE paciente_id = ? ORDER BY medicamento_id",
    )
    .bind(patient)
    .fetch_all(&self.pool)
    .await?;
    Ok(ids)
  }
}

/// Match resolved rows back to the requested names.
fn pair_ids(pair: &DrugPair, drugs: Vec<Drug>) -> (Option<DrugId>, Option<DrugId>) {
  let mut first = None;
  let mut second = None;
  for drug in drugs {
    if drug.nome == pair.first() {
      first = Some(drug.id);
    } else if drug.nome == pair.second() {
      second = Some(drug.id);
    }
  }
  (first, second)
}
