//! The seeding pipeline: one transaction, committed only if every step
//! succeeds.

use std::collections::HashSet;

use anyhow::{Context as _, bail, ensure};
use clap::Args;
use rand::Rng;
use rxjoin_core::{
  drug::{DrugId, InteractionPair, MAX_DRUG_NAME_LEN, Severity},
  patient::PatientId,
};
use rxjoin_store_sqlite::{Insert, SeedSession, SqliteStore};
use tracing::{error, info, warn};

use crate::generate::{self, Prescribing};

/// Patients generated and inserted per batch.
const PATIENT_BATCH: usize = 10_000;
/// Association rows buffered before a flush.
const ASSOCIATION_BATCH: usize = 50_000;
/// Progress is logged every this many patients.
const PROGRESS_EVERY: usize = 10_000;
/// Random interaction attempts allowed per requested interaction.
const ATTEMPTS_PER_INTERACTION: usize = 5;

/// Volumes and skew of the generated dataset.
#[derive(Args, Debug, Clone)]
pub struct SeedPlan {
  /// Number of patients to generate.
  #[arg(long, env = "RXJOIN_SEED_PATIENTS", default_value_t = 100_000)]
  pub patients: usize,

  /// Number of drugs to generate, including the two named drugs.
  #[arg(long, env = "RXJOIN_SEED_DRUGS", default_value_t = 1_000)]
  pub drugs: usize,

  /// Fewest distinct drugs a patient holds.
  #[arg(long, env = "RXJOIN_SEED_MIN_DRUGS_PER_PATIENT", default_value_t = 5)]
  pub min_drugs_per_patient: usize,

  /// Most distinct drugs a patient holds.
  #[arg(long, env = "RXJOIN_SEED_MAX_DRUGS_PER_PATIENT", default_value_t = 40)]
  pub max_drugs_per_patient: usize,

  /// Name of the first guaranteed drug.
  #[arg(long, env = "RXJOIN_SEED_DRUG_A", default_value = "DrogaA-Especial")]
  pub drug_a: String,

  /// Share of patients holding drug A.
  #[arg(long, env = "RXJOIN_SEED_PCT_DRUG_A", default_value_t = 0.15)]
  pub pct_drug_a: f64,

  /// Name of the second guaranteed drug.
  #[arg(long, env = "RXJOIN_SEED_DRUG_B", default_value = "DrogaB-Comum")]
  pub drug_b: String,

  /// Share of patients holding drug B.
  #[arg(long, env = "RXJOIN_SEED_PCT_DRUG_B", default_value_t = 0.18)]
  pub pct_drug_b: f64,

  /// Random interaction pairs added on top of the A–B interaction.
  #[arg(long, env = "RXJOIN_SEED_INTERACTIONS", default_value_t = 500)]
  pub interactions: usize,
}

impl SeedPlan {
  pub fn validate(&self) -> anyhow::Result<()> {
    ensure!(self.drugs >= 2, "at least two drugs are required");
    ensure!(
      self.min_drugs_per_patient <= self.max_drugs_per_patient,
      "min drugs per patient ({}) exceeds max ({})",
      self.min_drugs_per_patient,
      self.max_drugs_per_patient
    );
    ensure!(
      self.drugs >= self.max_drugs_per_patient,
      "{} drugs cannot supply {} distinct drugs per patient",
      self.drugs,
      self.max_drugs_per_patient
    );
    for (name, pct) in [("drug A", self.pct_drug_a), ("drug B", self.pct_drug_b)] {
      ensure!((0.0..=1.0).contains(&pct), "{name} prevalence {pct} is not in [0, 1]");
    }
    ensure!(self.drug_a != self.drug_b, "drug A and drug B must differ");
    for name in [&self.drug_a, &self.drug_b] {
      ensure!(!name.is_empty(), "drug names must not be empty");
      ensure!(
        name.chars().count() <= MAX_DRUG_NAME_LEN,
        "drug name {name:?} is longer than {MAX_DRUG_NAME_LEN} characters"
      );
    }
    Ok(())
  }
}

/// Rows written by a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
  pub drugs:        usize,
  pub patients:     usize,
  pub associations: usize,
  pub interactions: usize,
}

/// Populate `store` according to `plan`.
///
/// Everything happens in one transaction; on error it is rolled back and the
/// store is left as it was.
pub async fn run<R: Rng>(
  store: &SqliteStore,
  plan: &SeedPlan,
  rng: &mut R,
) -> anyhow::Result<Summary> {
  plan.validate()?;

  let mut session = store.begin_seed().await.context("failed to begin transaction")?;
  info!("transaction started");

  match populate(&mut session, plan, rng).await {
    Ok(summary) => {
      session.commit().await.context("failed to commit")?;
      info!("transaction committed");
      Ok(summary)
    }
    Err(e) => {
      error!(error = %format!("{e:#}"), "seeding failed, rolling back");
      match session.rollback().await {
        Ok(()) => info!("transaction rolled back"),
        Err(rb) => error!(error = %rb, "rollback failed"),
      }
      Err(e)
    }
  }
}

async fn populate<R: Rng>(
  session: &mut SeedSession,
  plan: &SeedPlan,
  rng: &mut R,
) -> anyhow::Result<Summary> {
  session.reset_schema().await.context("failed to apply schema")?;
  info!("schema applied");

  let (catalog, drug_a, drug_b) = seed_drugs(session, plan, rng).await?;
  let patients = seed_patients(session, plan, rng).await?;

  let rx = Prescribing {
    min_drugs: plan.min_drugs_per_patient,
    max_drugs: plan.max_drugs_per_patient,
    drug_a,
    pct_a: plan.pct_drug_a,
    drug_b,
    pct_b: plan.pct_drug_b,
  };
  let associations = seed_associations(session, &patients, &catalog, &rx, rng).await?;
  let interactions = seed_interactions(session, plan, &catalog, drug_a, drug_b, rng).await?;

  Ok(Summary {
    drugs: catalog.len(),
    patients: patients.len(),
    associations,
    interactions,
  })
}

// ─── Steps ────────────────────────────────────────────────────────────────────

/// Insert the two named drugs, then random unique names up to `plan.drugs`.
async fn seed_drugs<R: Rng>(
  session: &mut SeedSession,
  plan: &SeedPlan,
  rng: &mut R,
) -> anyhow::Result<(Vec<DrugId>, DrugId, DrugId)> {
  info!(count = plan.drugs, "generating drugs");
  let mut catalog = Vec::with_capacity(plan.drugs);
  for name in [&plan.drug_a, &plan.drug_b] {
    match session.insert_drug(name).await? {
      Insert::Inserted(id) => catalog.push(id),
      Insert::Duplicate => bail!("drug {name:?} already exists after schema reset"),
    }
  }
  let (drug_a, drug_b) = (catalog[0], catalog[1]);

  let mut seen: HashSet<String> = HashSet::from([plan.drug_a.clone(), plan.drug_b.clone()]);
  while catalog.len() < plan.drugs {
    let name = generate::drug_name(rng);
    if !seen.insert(name.clone()) {
      continue;
    }
    match session.insert_drug(&name).await? {
      Insert::Inserted(id) => catalog.push(id),
      Insert::Duplicate => warn!(name, "duplicate drug in store, skipping"),
    }
  }
  info!(count = catalog.len(), drug_a, drug_b, "drugs generated");
  Ok((catalog, drug_a, drug_b))
}

async fn seed_patients<R: Rng>(
  session: &mut SeedSession,
  plan: &SeedPlan,
  rng: &mut R,
) -> anyhow::Result<Vec<PatientId>> {
  info!(count = plan.patients, "generating patients");
  let mut remaining = plan.patients;
  while remaining > 0 {
    let batch = remaining.min(PATIENT_BATCH);
    let names: Vec<String> = (0..batch).map(|_| generate::patient_name(rng)).collect();
    session.insert_patients(&names).await?;
    remaining -= batch;
  }
  let ids = session.patient_ids().await?;
  info!(count = ids.len(), "patients generated");
  Ok(ids)
}

async fn seed_associations<R: Rng>(
  session: &mut SeedSession,
  patients: &[PatientId],
  catalog: &[DrugId],
  rx: &Prescribing,
  rng: &mut R,
) -> anyhow::Result<usize> {
  info!("generating patient-drug associations");
  let mut total = 0;
  let mut buffer = Vec::with_capacity(ASSOCIATION_BATCH + rx.max_drugs + 2);
  for (i, &patient) in patients.iter().enumerate() {
    let drugs = generate::drugs_for_patient(rng, catalog, rx);
    buffer.extend(drugs.into_iter().map(|drug| (patient, drug)));
    if buffer.len() >= ASSOCIATION_BATCH {
      session.insert_associations(&buffer).await?;
      total += buffer.len();
      buffer.clear();
    }
    if (i + 1) % PROGRESS_EVERY == 0 {
      info!(patients = i + 1, "associations in progress");
    }
  }
  session.insert_associations(&buffer).await?;
  total += buffer.len();
  info!(count = total, "associations generated");
  Ok(total)
}

/// The A–B interaction plus up to `plan.interactions` random pairs.
async fn seed_interactions<R: Rng>(
  session: &mut SeedSession,
  plan: &SeedPlan,
  catalog: &[DrugId],
  drug_a: DrugId,
  drug_b: DrugId,
  rng: &mut R,
) -> anyhow::Result<usize> {
  let mut seen = HashSet::new();
  let ab = InteractionPair::new(drug_a, drug_b).context("drug A and drug B share an id")?;
  let description = format!(
    "Interação crítica documentada entre {} e {}",
    plan.drug_a, plan.drug_b
  );
  if let Insert::Duplicate = session.insert_interaction(ab, Severity::Grave, &description).await? {
    bail!("interaction {ab} already exists after schema reset");
  }
  seen.insert(ab);
  info!(drug_a = %plan.drug_a, drug_b = %plan.drug_b, "critical interaction created");

  let possible = catalog.len() * (catalog.len() - 1) / 2;
  let max_attempts = plan.interactions * ATTEMPTS_PER_INTERACTION;
  let mut added = 0;
  let mut attempts = 0;
  while added < plan.interactions && seen.len() < possible && attempts < max_attempts {
    attempts += 1;
    let Some(pair) = generate::random_pair(rng, catalog) else {
      break;
    };
    if seen.contains(&pair) {
      continue;
    }
    let severity = generate::severity(rng);
    let description = format!(
      "Interação aleatória {} entre med {} e med {}",
      added + 1,
      pair.low(),
      pair.high()
    );
    match session.insert_interaction(pair, severity, &description).await? {
      Insert::Inserted(()) => {
        added += 1;
        if added % 100 == 0 {
          info!(count = added, "random interactions in progress");
        }
      }
      Insert::Duplicate => warn!(%pair, "duplicate interaction in store, skipping"),
    }
    seen.insert(pair);
  }
  if added < plan.interactions {
    warn!(
      attempts,
      added,
      requested = plan.interactions,
      "stopped before reaching the requested interaction count"
    );
  }
  info!(count = added + 1, "interactions generated");
  Ok(added + 1)
}
