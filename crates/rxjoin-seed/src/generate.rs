//! Pure random generators for synthetic rows.
//!
//! Nothing here touches the store; every function takes the RNG explicitly
//! so runs are reproducible with `--seed`.

use std::collections::HashSet;

use rand::{Rng, distributions::Alphanumeric};
use rxjoin_core::drug::{DrugId, InteractionPair, MAX_DRUG_NAME_LEN, Severity};
use strum::VariantArray as _;

use crate::names::{
  FIRST_NAMES, PRODUCT_ADJECTIVES, PRODUCT_MATERIALS, PRODUCT_NOUNS, SURNAMES,
};

fn pick<'a, R: Rng>(rng: &mut R, words: &[&'a str]) -> &'a str {
  words[rng.gen_range(0..words.len())]
}

/// `"<adjective> <material> <noun> <4 alphanumerics>"`, cut to the column
/// limit.
pub fn drug_name<R: Rng>(rng: &mut R) -> String {
  let suffix: String = (&mut *rng)
    .sample_iter(Alphanumeric)
    .take(4)
    .map(char::from)
    .collect();
  let name = format!(
    "{} {} {} {suffix}",
    pick(rng, PRODUCT_ADJECTIVES),
    pick(rng, PRODUCT_MATERIALS),
    pick(rng, PRODUCT_NOUNS),
  );
  name.chars().take(MAX_DRUG_NAME_LEN).collect()
}

/// A full name with one or two surnames.
pub fn patient_name<R: Rng>(rng: &mut R) -> String {
  let mut name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, SURNAMES));
  if rng.gen_bool(0.5) {
    name.push(' ');
    name.push_str(pick(rng, SURNAMES));
  }
  sanitize(&name)
}

/// Replace characters that break line-oriented bulk formats with spaces.
pub fn sanitize(name: &str) -> String {
  name.replace(['\n', '\t', '\\'], " ")
}

/// How many and which drugs each patient takes.
#[derive(Debug, Clone, Copy)]
pub struct Prescribing {
  pub min_drugs: usize,
  pub max_drugs: usize,
  pub drug_a:    DrugId,
  pub pct_a:     f64,
  pub drug_b:    DrugId,
  pub pct_b:     f64,
}

/// Distinct drugs for one patient.
///
/// Drug A and drug B are each added with their own probability, then random
/// drugs fill the list up to a target drawn from `[min_drugs, max_drugs]`.
/// The forced drugs count toward the target, so it is never exceeded. The
/// list never holds more distinct drugs than `catalog` offers.
pub fn drugs_for_patient<R: Rng>(
  rng: &mut R,
  catalog: &[DrugId],
  rx: &Prescribing,
) -> Vec<DrugId> {
  let target = rng.gen_range(rx.min_drugs..=rx.max_drugs);
  let mut held = HashSet::with_capacity(target);
  if rng.gen_bool(rx.pct_a) && held.len() < target {
    held.insert(rx.drug_a);
  }
  if rng.gen_bool(rx.pct_b) && held.len() < target {
    held.insert(rx.drug_b);
  }
  while held.len() < target && held.len() < catalog.len() {
    held.insert(catalog[rng.gen_range(0..catalog.len())]);
  }
  held.into_iter().collect()
}

/// A uniformly random pair of two different drugs from `catalog`.
///
/// Returns `None` when the catalog has fewer than two drugs.
pub fn random_pair<R: Rng>(rng: &mut R, catalog: &[DrugId]) -> Option<InteractionPair> {
  if catalog.len() < 2 {
    return None;
  }
  let first = rng.gen_range(0..catalog.len());
  let mut second = rng.gen_range(0..catalog.len());
  while second == first {
    second = rng.gen_range(0..catalog.len());
  }
  InteractionPair::new(catalog[first], catalog[second])
}

pub fn severity<R: Rng>(rng: &mut R) -> Severity {
  Severity::VARIANTS[rng.gen_range(0..Severity::VARIANTS.len())]
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn rng() -> StdRng { StdRng::seed_from_u64(7) }

  fn rx() -> Prescribing {
    Prescribing {
      min_drugs: 5,
      max_drugs: 40,
      drug_a:    1,
      pct_a:     0.15,
      drug_b:    2,
      pct_b:     0.18,
    }
  }

  #[test]
  fn drug_names_fit_the_column_and_end_with_code() {
    let mut rng = rng();
    for _ in 0..200 {
      let name = drug_name(&mut rng);
      assert!(name.chars().count() <= MAX_DRUG_NAME_LEN);
      let code = name.rsplit(' ').next().unwrap();
      assert_eq!(code.len(), 4, "{name}");
      assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{name}");
    }
  }

  #[test]
  fn patient_names_have_no_control_characters() {
    let mut rng = rng();
    for _ in 0..200 {
      let name = patient_name(&mut rng);
      assert!(!name.contains(['\n', '\t', '\\']));
      assert!(name.split(' ').count() >= 2);
    }
  }

  #[test]
  fn sanitize_replaces_line_breaking_characters() {
    assert_eq!(sanitize("a\tb\nc\\d"), "a b c d");
  }

  #[test]
  fn patients_hold_distinct_drugs_within_bounds() {
    let mut rng = rng();
    let catalog: Vec<DrugId> = (1..=1_000).collect();
    for _ in 0..500 {
      let drugs = drugs_for_patient(&mut rng, &catalog, &rx());
      let distinct: HashSet<_> = drugs.iter().collect();
      assert_eq!(distinct.len(), drugs.len());
      assert!((5..=40).contains(&drugs.len()), "{}", drugs.len());
    }
  }

  #[test]
  fn small_catalog_caps_drug_count() {
    let mut rng = rng();
    let catalog: Vec<DrugId> = vec![1, 2, 3];
    let drugs = drugs_for_patient(&mut rng, &catalog, &rx());
    assert_eq!(drugs.len(), 3);
  }

  #[test]
  fn forced_drugs_never_exceed_target() {
    let mut rng = rng();
    let catalog: Vec<DrugId> = (1..=10).collect();
    let rx = Prescribing {
      min_drugs: 1,
      max_drugs: 1,
      pct_a: 1.0,
      pct_b: 1.0,
      ..rx()
    };
    for _ in 0..100 {
      assert_eq!(drugs_for_patient(&mut rng, &catalog, &rx), vec![1]);
    }
  }

  #[test]
  fn prevalence_is_roughly_respected() {
    let mut rng = rng();
    let catalog: Vec<DrugId> = (1..=1_000).collect();
    let rx = Prescribing { min_drugs: 1, max_drugs: 1, ..rx() };
    let on_a = (0..10_000)
      .filter(|_| drugs_for_patient(&mut rng, &catalog, &rx).contains(&1))
      .count();
    // 15% forced, plus a tiny chance of being drawn at random.
    assert!((1_200..=1_800).contains(&on_a), "{on_a}");
  }

  #[test]
  fn random_pairs_are_canonical_and_distinct() {
    let mut rng = rng();
    let catalog: Vec<DrugId> = (10..20).collect();
    for _ in 0..200 {
      let pair = random_pair(&mut rng, &catalog).unwrap();
      assert!(pair.low() < pair.high());
      assert!(catalog.contains(&pair.low()) && catalog.contains(&pair.high()));
    }
    assert!(random_pair(&mut rng, &[1]).is_none());
  }

  #[test]
  fn severities_cover_all_variants() {
    let mut rng = rng();
    let seen: HashSet<Severity> = (0..200).map(|_| severity(&mut rng)).collect();
    assert_eq!(seen.len(), Severity::VARIANTS.len());
  }
}
