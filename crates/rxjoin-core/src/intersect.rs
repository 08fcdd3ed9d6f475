//! Application-side intersection of two patient-id sets.

use std::{collections::HashSet, hash::Hash};

/// Return the elements present in both `a` and `b`.
///
/// Iterates the smaller set and probes the larger one, so the cost is
/// proportional to `min(|a|, |b|)`. When the sizes are equal `b` is iterated.
/// The output order follows the iterated set and is otherwise unspecified.
pub fn intersect_smaller_first<T>(a: &HashSet<T>, b: &HashSet<T>) -> Vec<T>
where
  T: Eq + Hash + Copy,
{
  let (small, large) = if a.len() < b.len() { (a, b) } else { (b, a) };
  small
    .iter()
    .filter(|id| large.contains(id))
    .copied()
    .collect()
}
