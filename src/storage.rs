//! Ordered storage for candidate minimizer boxes.
//!
//! Candidates live in a `BTreeMap` keyed by `(flo, id)`. The `id` is a
//! per-set insertion counter, so identical candidates can coexist and ties on
//! `flo` keep insertion order. Because the map is sorted by `flo`, discarding
//! every candidate with `flo >= bound` is a single `split_off` of the tail.
//!
//! | Operation                  | Cost              |
//! |----------------------------|-------------------|
//! | `CandidateSet::insert()`   | O(log n)          |
//! | `CandidateSet::evict_from()` | O(log n + k)    |
//! | `CandidateSet::iter()`     | ascending `flo`   |

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::Candidate;

/// Ordering key: lower enclosure bound, then insertion id.
///
/// Uses `total_cmp` so the ordering is total even for NaN bounds.
#[derive(Debug, Clone, Copy)]
struct CandidateKey {
    flo: f64,
    id: u64,
}

impl CandidateKey {
    fn new(flo: f64, id: u64) -> Self {
        // total_cmp orders -0.0 below 0.0; fold it so equal bounds compare equal.
        Self { flo: flo + 0.0, id }
    }
}

impl PartialEq for CandidateKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CandidateKey {}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.flo
            .total_cmp(&other.flo)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Candidate boxes ordered by ascending lower bound.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    tree: BTreeMap<CandidateKey, Candidate>,
    next_id: u64,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate. Duplicates are kept.
    pub fn insert(&mut self, candidate: Candidate) {
        let key = CandidateKey::new(candidate.flo, self.next_id);
        self.next_id += 1;
        self.tree.insert(key, candidate);
    }

    /// Remove every candidate whose `flo` is at or above `bound`.
    ///
    /// Returns the number of candidates removed.
    pub fn evict_from(&mut self, bound: f64) -> usize {
        let pivot = CandidateKey::new(bound, 0);
        let evicted = self.tree.split_off(&pivot);
        evicted.len()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Candidates in ascending `flo` order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.tree.values()
    }

    /// Candidate with the smallest `flo`, if any.
    pub fn first(&self) -> Option<&Candidate> {
        self.tree.values().next()
    }

    /// Candidate with the largest `flo`, if any.
    pub fn last(&self) -> Option<&Candidate> {
        self.tree.values().next_back()
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.tree.into_values().collect()
    }
}

impl Extend<Candidate> for CandidateSet {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        for c in iter {
            self.insert(c);
        }
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::types::SearchBox;

    fn cand(flo: f64, fhi: f64) -> Candidate {
        let region = SearchBox::from_bounds((0.0, 1.0), (0.0, 1.0)).unwrap();
        Candidate::new(region, Interval::new(flo, fhi))
    }

    fn flos(set: &CandidateSet) -> Vec<f64> {
        set.iter().map(|c| c.flo).collect()
    }

    // ────────────────────────────────────────────────────────────────
    // Ordering
    // ────────────────────────────────────────────────────────────────

    #[test]
    fn test_iteration_is_ascending() {
        let mut set = CandidateSet::new();
        for flo in [3.0, -1.0, 2.0, 0.5] {
            set.insert(cand(flo, flo + 1.0));
        }
        assert_eq!(flos(&set), vec![-1.0, 0.5, 2.0, 3.0]);
        assert_eq!(set.first().map(|c| c.flo), Some(-1.0));
        assert_eq!(set.last().map(|c| c.flo), Some(3.0));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut set = CandidateSet::new();
        set.insert(cand(1.0, 2.0));
        set.insert(cand(1.0, 2.0));
        set.insert(cand(1.0, 2.0));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut set = CandidateSet::new();
        set.insert(cand(1.0, 4.0));
        set.insert(cand(1.0, 2.0));
        set.insert(cand(1.0, 3.0));
        let fhis: Vec<f64> = set.iter().map(|c| c.fhi).collect();
        assert_eq!(fhis, vec![4.0, 2.0, 3.0]);
    }

    // ────────────────────────────────────────────────────────────────
    // Eviction
    // ────────────────────────────────────────────────────────────────

    #[test]
    fn test_evict_removes_suffix() {
        let mut set: CandidateSet = [0.0, 1.0, 2.0, 3.0, 4.0]
            .into_iter()
            .map(|f| cand(f, f + 0.5))
            .collect();
        let removed = set.evict_from(2.5);
        assert_eq!(removed, 2);
        assert_eq!(flos(&set), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_evict_is_inclusive_of_bound() {
        let mut set: CandidateSet = [1.0, 2.0, 2.0, 3.0]
            .into_iter()
            .map(|f| cand(f, f))
            .collect();
        assert_eq!(set.evict_from(2.0), 3);
        assert_eq!(flos(&set), vec![1.0]);
    }

    #[test]
    fn test_evict_treats_signed_zeros_as_equal() {
        let mut set = CandidateSet::new();
        set.insert(cand(-0.0, 1.0));
        assert_eq!(set.evict_from(0.0), 1);
    }

    #[test]
    fn test_evict_everything_and_nothing() {
        let mut set: CandidateSet = [1.0, 2.0].into_iter().map(|f| cand(f, f)).collect();
        assert_eq!(set.evict_from(f64::INFINITY), 0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.evict_from(f64::NEG_INFINITY), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_after_evict() {
        let mut set = CandidateSet::new();
        set.insert(cand(5.0, 6.0));
        set.evict_from(0.0);
        set.insert(cand(-1.0, 0.0));
        assert_eq!(flos(&set), vec![-1.0]);
        assert_eq!(set.into_vec().len(), 1);
    }
}
