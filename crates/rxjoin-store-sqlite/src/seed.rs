//! Transactional write path used by the seeder.
//!
//! Every write goes through one [`SeedSession`], which wraps a single
//! transaction. Dropping a session without calling [`SeedSession::commit`]
//! rolls everything back.

use rxjoin_core::{
  drug::{DrugId, InteractionPair, Severity},
  patient::PatientId,
};
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use crate::{
  Error, Result,
  schema::{DROP_ALL, SCHEMA, statements},
  store::{Builder, MAX_BIND_PARAMS},
};

/// Outcome of an insert that may collide with a UNIQUE constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert<T> {
  Inserted(T),
  /// The row already exists; nothing was written.
  Duplicate,
}

pub struct SeedSession {
  tx: Transaction<'static, Sqlite>,
}

impl SeedSession {
  pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self { Self { tx } }

  /// Drop and recreate every table inside the transaction.
  pub async fn reset_schema(&mut self) -> Result<()> {
    for stmt in statements(DROP_ALL).chain(statements(SCHEMA)) {
      sqlx::query(stmt).execute(&mut *self.tx).await?;
    }
    Ok(())
  }

  pub async fn insert_drug(&mut self, nome: &str) -> Result<Insert<DrugId>> {
    let outcome = sqlx::query("INSERT INTO medicamentos (nome) VALUES (?)")
      .bind(nome)
      .execute(&mut *self.tx)
      .await
      .map_err(Error::from);
    match outcome {
      Ok(done) => Ok(Insert::Inserted(done.last_insert_rowid())),
      Err(e) if e.is_unique_violation() => Ok(Insert::Duplicate),
      Err(e) => Err(e),
    }
  }

  /// Multi-row insert of patient names. Ids are assigned by the store.
  pub async fn insert_patients(&mut self, names: &[String]) -> Result<()> {
    for chunk in names.chunks(MAX_BIND_PARAMS) {
      let mut builder = Builder::new("INSERT INTO pacientes (nome) ");
      builder.push_values(chunk, |mut row, nome| {
        row.push_bind(nome.as_str());
      });
      builder.build().execute(&mut *self.tx).await?;
    }
    debug!(rows = names.len(), "patients inserted");
    Ok(())
  }

  /// Every patient id, ascending.
  pub async fn patient_ids(&mut self) -> Result<Vec<PatientId>> {
    let ids = sqlx::query_scalar("SELECT id FROM pacientes ORDER BY id")
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(ids)
  }

  /// Multi-row insert of `(patient, drug)` edges.
  pub async fn insert_associations(
    &mut self,
    edges: &[(PatientId, DrugId)],
  ) -> Result<()> {
    for chunk in edges.chunks(MAX_BIND_PARAMS / 2) {
      let mut builder =
        Builder::new("INSERT INTO paciente_medicamentos (paciente_id, medicamento_id) ");
      builder.push_values(chunk, |mut row, (patient, drug)| {
        row.push_bind(*patient).push_bind(*drug);
      });
      builder.build().execute(&mut *self.tx).await?;
    }
    Ok(())
  }

  pub async fn insert_interaction(
    &mut self,
    pair: InteractionPair,
    severity: Severity,
    descricao: &str,
  ) -> Result<Insert<()>> {
    let outcome = sqlx::query(
      "INSERT INTO interacoes_medicamentosas (med1_id, med2_id, severidade, descricao)
       VALUES (?, ?, ?, ?)",
    )
    .bind(pair.low())
    .bind(pair.high())
    .bind(severity.as_ref())
    .bind(descricao)
    .execute(&mut *self.tx)
    .await
    .map_err(Error::from);
    match outcome {
      Ok(_) => Ok(Insert::Inserted(())),
      Err(e) if e.is_unique_violation() => Ok(Insert::Duplicate),
      Err(e) => Err(e),
    }
  }

  pub async fn commit(self) -> Result<()> {
    self.tx.commit().await?;
    Ok(())
  }

  pub async fn rollback(self) -> Result<()> {
    self.tx.rollback().await?;
    Ok(())
  }
}
