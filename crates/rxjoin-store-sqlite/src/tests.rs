//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use rxjoin_core::{
  drug::{DrugId, InteractionPair, Severity},
  patient::PatientId,
  query::DrugPair,
};

use crate::{Insert, SqliteStore};

const DRUG_A: &str = "DrogaA-Especial";
const DRUG_B: &str = "DrogaB-Comum";
const DRUG_C: &str = "Paracetamol";
const DRUG_D: &str = "Ibuprofeno";
const DRUG_E: &str = "Sem Pacientes";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// 50 patients over five drugs.
///
/// - A: multiples of 3, plus 42
/// - B: multiples of 4, plus 42
/// - C: multiples of 5
/// - D: even ids
/// - E: nobody
///
/// Interactions: A–B (Grave), A–C (Moderada), A–E (Leve). B–D do not interact.
async fn seeded_store() -> SqliteStore {
  let s = store().await;
  let mut session = s.begin_seed().await.unwrap();

  let mut ids = Vec::new();
  for name in [DRUG_A, DRUG_B, DRUG_C, DRUG_D, DRUG_E] {
    match session.insert_drug(name).await.unwrap() {
      Insert::Inserted(id) => ids.push(id),
      Insert::Duplicate => panic!("fresh table reported a duplicate"),
    }
  }
  let [a, b, c, d, e]: [DrugId; 5] = ids.try_into().unwrap();

  let names: Vec<String> = (1..=50).map(|i| format!("Paciente {i}")).collect();
  session.insert_patients(&names).await.unwrap();
  let patients = session.patient_ids().await.unwrap();
  assert_eq!(patients, (1..=50).collect::<Vec<PatientId>>());

  let mut edges = Vec::new();
  for p in patients {
    let mut held = BTreeSet::new();
    if p % 3 == 0 || p == 42 {
      held.insert(a);
    }
    if p % 4 == 0 || p == 42 {
      held.insert(b);
    }
    if p % 5 == 0 {
      held.insert(c);
    }
    if p % 2 == 0 {
      held.insert(d);
    }
    edges.extend(held.into_iter().map(|drug| (p, drug)));
  }
  session.insert_associations(&edges).await.unwrap();

  for (x, y, severity) in [
    (b, a, Severity::Grave),
    (a, c, Severity::Moderada),
    (e, a, Severity::Leve),
  ] {
    let pair = InteractionPair::new(x, y).unwrap();
    let outcome = session
      .insert_interaction(pair, severity, "interação de teste")
      .await
      .unwrap();
    assert_eq!(outcome, Insert::Inserted(()));
  }

  session.commit().await.unwrap();
  s
}

fn pair(a: &str, b: &str) -> DrugPair {
  DrugPair::new(Some(a.to_owned()), Some(b.to_owned())).unwrap()
}

fn ids(patients: &[rxjoin_core::patient::Patient]) -> BTreeSet<PatientId> {
  patients.iter().map(|p| p.id).collect()
}

// ─── Standard join ───────────────────────────────────────────────────────────

#[tokio::test]
async fn standard_join_finds_patients_on_interacting_pair() {
  let s = seeded_store().await;
  let found = s.standard_join(&pair(DRUG_A, DRUG_B)).await.unwrap();
  assert_eq!(ids(&found), BTreeSet::from([12, 24, 36, 42, 48]));
  let p42 = found.iter().find(|p| p.id == 42).unwrap();
  assert_eq!(p42.nome, "Paciente 42");
}

#[tokio::test]
async fn standard_join_returns_each_patient_once() {
  let s = seeded_store().await;
  let found = s.standard_join(&pair(DRUG_A, DRUG_C)).await.unwrap();
  assert_eq!(found.len(), ids(&found).len());
  assert_eq!(ids(&found), BTreeSet::from([15, 30, 45]));
}

// ─── Lookup & expand ─────────────────────────────────────────────────────────

#[tokio::test]
async fn lookup_and_expand_finds_patients_on_interacting_pair() {
  let s = seeded_store().await;
  let found = s.lookup_and_expand(&pair(DRUG_A, DRUG_B)).await.unwrap();
  assert_eq!(ids(&found), BTreeSet::from([12, 24, 36, 42, 48]));
}

#[tokio::test]
async fn lookup_and_expand_returns_rows_ordered_by_id() {
  let s = seeded_store().await;
  let found = s.lookup_and_expand(&pair(DRUG_B, DRUG_A)).await.unwrap();
  let order: Vec<PatientId> = found.iter().map(|p| p.id).collect();
  assert_eq!(order, vec![12, 24, 36, 42, 48]);
}

#[tokio::test]
async fn lookup_and_expand_drug_without_patients_is_empty() {
  let s = seeded_store().await;
  assert!(s.lookup_and_expand(&pair(DRUG_E, DRUG_A)).await.unwrap().is_empty());
  assert!(s.lookup_and_expand(&pair(DRUG_A, DRUG_E)).await.unwrap().is_empty());
}

// ─── Agreement between strategies ────────────────────────────────────────────

#[tokio::test]
async fn strategies_agree_for_every_drug_combination() {
  let s = seeded_store().await;
  let names = [DRUG_A, DRUG_B, DRUG_C, DRUG_D, DRUG_E, "Inexistente"];
  for x in names {
    for y in names {
      if x == y {
        continue;
      }
      let q = pair(x, y);
      let joined = s.standard_join(&q).await.unwrap();
      let expanded = s.lookup_and_expand(&q).await.unwrap();
      assert_eq!(ids(&joined), ids(&expanded), "{x} / {y}");

      let swapped = s.lookup_and_expand(&q.swapped()).await.unwrap();
      assert_eq!(ids(&expanded), ids(&swapped), "swapped {x} / {y}");
    }
  }
}

#[tokio::test]
async fn unknown_drug_yields_empty_result() {
  let s = seeded_store().await;
  let q = pair(DRUG_A, "Inexistente");
  assert!(s.standard_join(&q).await.unwrap().is_empty());
  assert!(s.lookup_and_expand(&q).await.unwrap().is_empty());
}

#[tokio::test]
async fn non_interacting_drugs_yield_empty_result() {
  let s = seeded_store().await;
  // B and D share patients 4, 8, ... but have no interaction record.
  let q = pair(DRUG_B, DRUG_D);
  assert!(s.standard_join(&q).await.unwrap().is_empty());
  assert!(s.lookup_and_expand(&q).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_store_yields_empty_result() {
  let s = store().await;
  let q = pair(DRUG_A, DRUG_B);
  assert!(s.standard_join(&q).await.unwrap().is_empty());
  assert!(s.lookup_and_expand(&q).await.unwrap().is_empty());
}

// ─── Building blocks ─────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_drugs_returns_only_existing_names() {
  let s = seeded_store().await;
  let found = s.resolve_drugs(&pair(DRUG_C, "Inexistente")).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].nome, DRUG_C);
}

#[tokio::test]
async fn interaction_lookup_uses_canonical_pair() {
  let s = seeded_store().await;
  let a = s.drug_by_name(DRUG_A).await.unwrap().unwrap().id;
  let b = s.drug_by_name(DRUG_B).await.unwrap().unwrap().id;
  let d = s.drug_by_name(DRUG_D).await.unwrap().unwrap().id;

  assert!(s.interaction_exists(InteractionPair::new(b, a).unwrap()).await.unwrap());
  assert!(!s.interaction_exists(InteractionPair::new(b, d).unwrap()).await.unwrap());

  let stored = s.interaction(InteractionPair::new(a, b).unwrap()).await.unwrap().unwrap();
  assert_eq!(stored.severity, Severity::Grave);
}

#[tokio::test]
async fn patients_by_id_fetches_exactly_the_requested_ids() {
  let s = seeded_store().await;
  let found = s.patients_by_id(&[7, 3, 49]).await.unwrap();
  let order: Vec<PatientId> = found.iter().map(|p| p.id).collect();
  assert_eq!(order, vec![3, 7, 49]);
}

// ─── Seeding session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_drug_name_is_reported_not_raised() {
  let s = store().await;
  let mut session = s.begin_seed().await.unwrap();
  assert!(matches!(session.insert_drug("X").await.unwrap(), Insert::Inserted(_)));
  assert_eq!(session.insert_drug("X").await.unwrap(), Insert::Duplicate);
  session.commit().await.unwrap();
  assert_eq!(s.table_counts().await.unwrap().drugs, 1);
}

#[tokio::test]
async fn duplicate_interaction_is_reported_not_raised() {
  let s = store().await;
  let mut session = s.begin_seed().await.unwrap();
  let Insert::Inserted(x) = session.insert_drug("X").await.unwrap() else { panic!() };
  let Insert::Inserted(y) = session.insert_drug("Y").await.unwrap() else { panic!() };
  let p = InteractionPair::new(x, y).unwrap();
  let q = InteractionPair::new(y, x).unwrap();
  assert_eq!(
    session.insert_interaction(p, Severity::Leve, "a").await.unwrap(),
    Insert::Inserted(())
  );
  assert_eq!(
    session.insert_interaction(q, Severity::Grave, "b").await.unwrap(),
    Insert::Duplicate
  );
  session.commit().await.unwrap();
  assert_eq!(s.table_counts().await.unwrap().interactions, 1);
}

#[tokio::test]
async fn rolled_back_session_leaves_store_untouched() {
  let s = seeded_store().await;
  let before = s.table_counts().await.unwrap();

  let mut session = s.begin_seed().await.unwrap();
  session.reset_schema().await.unwrap();
  session.insert_drug("Temporário").await.unwrap();
  session.rollback().await.unwrap();

  assert_eq!(s.table_counts().await.unwrap(), before);
  assert!(s.drug_by_name("Temporário").await.unwrap().is_none());
  assert!(s.drug_by_name(DRUG_A).await.unwrap().is_some());
}

#[tokio::test]
async fn dropped_session_rolls_back() {
  let s = store().await;
  {
    let mut session = s.begin_seed().await.unwrap();
    session.insert_drug("Efêmero").await.unwrap();
  }
  assert!(s.drug_by_name("Efêmero").await.unwrap().is_none());
}

#[tokio::test]
async fn reset_schema_empties_every_table() {
  let s = seeded_store().await;
  let mut session = s.begin_seed().await.unwrap();
  session.reset_schema().await.unwrap();
  session.commit().await.unwrap();
  assert_eq!(s.table_counts().await.unwrap(), Default::default());
}

#[tokio::test]
async fn table_counts_reflect_seeded_rows() {
  let s = seeded_store().await;
  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.patients, 50);
  assert_eq!(counts.drugs, 5);
  assert_eq!(counts.interactions, 3);
  assert_eq!(s.drugs_of_patient(42).await.unwrap().len(), 3);
}
