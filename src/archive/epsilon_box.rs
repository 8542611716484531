//! Epsilon-box dominance archive.
//!
//! # Invariants
//!
//! 1. No member is dominated by another member.
//! 2. No two members share a box index.
//!
//! Members leave the archive only when a new solution dominates them or
//! displaces them within their box. There is no capacity cap: the size is
//! bounded by the number of mutually non-dominated occupied boxes.
//!
//! # References
//!
//! - Laumanns et al. (2002), "Combining Convergence and Diversity in
//!   Evolutionary Multi-Objective Optimization", Evolutionary Computation 10(3)
//! - Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//!   Evolutionary Computing Framework", Evolutionary Computation 21(2)

use super::epsilons::{BoxIndex, Epsilons};
use crate::core::{dominance, Dominance, Solution};

/// Outcome of [`EpsilonBoxArchive::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The solution was not retained.
    Rejected,
    /// The solution was retained without removing any member.
    Filled,
    /// The solution was retained and removed `displaced` members, either its
    /// same-box predecessor or members it dominates. This is epsilon-progress.
    Improved { displaced: usize },
}

impl Insertion {
    /// Returns `true` if the solution is now an archive member.
    pub fn is_accepted(self) -> bool {
        !matches!(self, Insertion::Rejected)
    }

    /// Returns `true` if the insertion counts as epsilon-progress.
    pub fn is_improvement(self) -> bool {
        matches!(self, Insertion::Improved { .. })
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: BoxIndex,
    solution: Solution,
}

/// Bounded set of non-dominated, box-unique solutions.
///
/// Not internally synchronized; see [`SharedArchive`](super::SharedArchive)
/// for a mutex-guarded handle.
///
/// # Example
///
/// ```
/// use u_moea::archive::{EpsilonBoxArchive, Epsilons};
/// use u_moea::core::Solution;
///
/// let mut archive = EpsilonBoxArchive::new(Epsilons::uniform(0.1).unwrap());
/// assert!(archive.add(Solution::from_objectives(vec![1.0, 1.0])));
/// // same box, dominated
/// assert!(!archive.add(Solution::from_objectives(vec![1.05, 1.02])));
/// assert!(archive.add(Solution::from_objectives(vec![0.5, 5.0])));
/// assert_eq!(archive.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EpsilonBoxArchive {
    epsilons: Epsilons,
    entries: Vec<Entry>,
    accepted: usize,
    improvements: usize,
}

impl EpsilonBoxArchive {
    /// Creates an empty archive.
    pub fn new(epsilons: Epsilons) -> Self {
        Self {
            epsilons,
            entries: Vec::new(),
            accepted: 0,
            improvements: 0,
        }
    }

    /// Creates an archive and inserts every solution of `solutions` in order.
    pub fn with_solutions<I>(epsilons: Epsilons, solutions: I) -> Self
    where
        I: IntoIterator<Item = Solution>,
    {
        let mut archive = Self::new(epsilons);
        for solution in solutions {
            archive.insert(solution);
        }
        archive
    }

    /// Inserts `solution`, reporting what happened.
    ///
    /// Acceptance is decided before any member is touched, so a rejected
    /// solution never evicts anything.
    ///
    /// # Panics
    /// Panics if `solution` has not been evaluated.
    pub fn insert(&mut self, solution: Solution) -> Insertion {
        assert!(
            solution.is_evaluated(),
            "unevaluated solution offered to the archive"
        );
        let key = self.epsilons.box_index(solution.objectives());

        let mut evict = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match dominance(&solution, &entry.solution) {
                Dominance::DominatedBy => return Insertion::Rejected,
                // same-box tie: the incumbent stays
                Dominance::NonDominated if entry.key == key => return Insertion::Rejected,
                Dominance::Dominates => evict.push(true),
                Dominance::NonDominated => evict.push(false),
            }
        }

        let before = self.entries.len();
        let mut flags = evict.into_iter();
        self.entries.retain(|_| !flags.next().unwrap_or(false));
        let displaced = before - self.entries.len();

        self.entries.push(Entry { key, solution });
        self.accepted += 1;

        if displaced > 0 {
            self.improvements += 1;
            Insertion::Improved { displaced }
        } else {
            Insertion::Filled
        }
    }

    /// Inserts `solution`, returning whether it was retained.
    pub fn add(&mut self, solution: Solution) -> bool {
        self.insert(solution).is_accepted()
    }

    /// Returns `true` if some member occupies the same box as `solution`.
    pub fn contains_equivalent_box(&self, solution: &Solution) -> bool {
        let key = self.epsilons.box_index(solution.objectives());
        self.entries.iter().any(|e| e.key == key)
    }

    /// Box index of `solution` under this archive's epsilons.
    pub fn box_index(&self, solution: &Solution) -> BoxIndex {
        self.epsilons.box_index(solution.objectives())
    }

    pub fn epsilons(&self) -> &Epsilons {
        &self.epsilons
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Member at position `index` (insertion order of survivors).
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.entries.get(index).map(|e| &e.solution)
    }

    /// Iterates over the current members.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> + '_ {
        self.entries.iter().map(|e| &e.solution)
    }

    /// Defensive copy of the current members: the run's approximation set.
    pub fn snapshot(&self) -> Vec<Solution> {
        self.iter().cloned().collect()
    }

    /// Total number of accepted insertions.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Total number of insertions that displaced or dominated a member.
    pub fn improvements(&self) -> usize {
        self.improvements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;

    fn point(values: &[f64]) -> Solution {
        Solution::from_objectives(values.to_vec())
    }

    fn archive(eps: f64) -> EpsilonBoxArchive {
        EpsilonBoxArchive::new(Epsilons::uniform(eps).unwrap())
    }

    fn assert_invariants(archive: &EpsilonBoxArchive) {
        let members = archive.snapshot();
        for (i, a) in members.iter().enumerate() {
            for b in members.iter().skip(i + 1) {
                assert_ne!(archive.box_index(a), archive.box_index(b), "shared box");
                assert_eq!(dominance(a, b), Dominance::NonDominated, "dominated member");
            }
        }
    }

    #[test]
    fn test_same_box_dominated_rejected() {
        let mut a = archive(0.1);
        assert_eq!(a.insert(point(&[1.0, 1.0])), Insertion::Filled);
        assert_eq!(a.insert(point(&[1.05, 1.02])), Insertion::Rejected);
        assert_eq!(a.insert(point(&[0.5, 5.0])), Insertion::Filled);

        assert_eq!(a.len(), 2);
        let boxes: Vec<BoxIndex> = a.iter().map(|s| a.box_index(s)).collect();
        assert!(boxes.iter().any(|b| b.as_slice() == [10, 10]));
        assert!(boxes.iter().any(|b| b.as_slice() == [5, 50]));
        assert_eq!(a.get(0).unwrap().objectives(), &[1.0, 1.0]);
    }

    #[test]
    fn test_same_box_dominating_replaces() {
        let mut a = archive(0.1);
        a.add(point(&[1.05, 1.02]));
        assert_eq!(
            a.insert(point(&[1.0, 1.0])),
            Insertion::Improved { displaced: 1 }
        );
        assert_eq!(a.len(), 1);
        assert_eq!(a.get(0).unwrap().objectives(), &[1.0, 1.0]);
        assert_eq!(a.improvements(), 1);
    }

    #[test]
    fn test_same_box_tie_keeps_incumbent() {
        let mut a = archive(0.1);
        a.add(point(&[1.01, 1.08]));
        assert_eq!(a.insert(point(&[1.08, 1.01])), Insertion::Rejected);
        assert_eq!(a.get(0).unwrap().objectives(), &[1.01, 1.08]);
    }

    #[test]
    fn test_identical_point_rejected() {
        let mut a = archive(0.1);
        assert!(a.add(point(&[2.0, 3.0])));
        assert!(!a.add(point(&[2.0, 3.0])));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_dominating_removes_other_boxes() {
        let mut a = archive(0.1);
        a.add(point(&[2.0, 5.0]));
        a.add(point(&[3.0, 4.0]));
        a.add(point(&[5.0, 1.0]));
        assert_eq!(a.len(), 3);

        assert_eq!(
            a.insert(point(&[1.0, 3.5])),
            Insertion::Improved { displaced: 2 }
        );
        assert_eq!(a.len(), 2);
        assert_invariants(&a);
    }

    #[test]
    fn test_rejected_solution_evicts_nothing() {
        let mut a = archive(1.0);
        a.add(point(&[0.5, 0.5]));
        a.add(point(&[3.5, 0.2]));
        // dominates nothing useful but is dominated by (0.5, 0.5)
        assert!(!a.add(point(&[0.9, 0.9])));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_counters() {
        let mut a = archive(0.1);
        a.add(point(&[3.0, 3.0]));
        a.add(point(&[1.0, 5.0]));
        a.add(point(&[9.0, 9.0]));
        a.add(point(&[2.0, 2.0]));
        assert_eq!(a.accepted(), 3);
        assert_eq!(a.improvements(), 1);
    }

    #[test]
    fn test_contains_equivalent_box() {
        let mut a = archive(0.5);
        a.add(point(&[1.1, 1.1]));
        assert!(a.contains_equivalent_box(&point(&[1.4, 1.2])));
        assert!(!a.contains_equivalent_box(&point(&[1.6, 1.2])));
    }

    #[test]
    fn test_infeasible_replaced_by_feasible() {
        let mut a = archive(0.1);
        a.add(Solution::evaluated(vec![], vec![0.0, 0.0], vec![1.0]));
        let insertion = a.insert(Solution::evaluated(vec![], vec![4.0, 4.0], vec![0.0]));
        assert_eq!(insertion, Insertion::Improved { displaced: 1 });
        assert!(a.iter().all(Solution::is_feasible));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut a = archive(0.1);
        a.add(point(&[1.0, 2.0]));
        let mut snap = a.snapshot();
        snap[0].set_operator_index(4);
        assert_eq!(a.get(0).unwrap().operator_index(), None);
    }

    #[test]
    #[should_panic(expected = "unevaluated solution offered to the archive")]
    fn test_unevaluated_panics() {
        archive(0.1).add(Solution::new(vec![0.5]));
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(points in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), 1..60)) {
            let mut a = archive(0.5);
            for (x, y) in points {
                a.add(point(&[x, y]));
            }
            let members = a.snapshot();
            for (i, m) in members.iter().enumerate() {
                for n in members.iter().skip(i + 1) {
                    prop_assert_ne!(a.box_index(m), a.box_index(n));
                    prop_assert_eq!(dominance(m, n), Dominance::NonDominated);
                }
            }
        }

        #[test]
        fn prop_occupancy_is_order_independent(
            cells in prop::collection::btree_set((0i64..20, 0i64..20), 1..40),
            seed in any::<u64>(),
        ) {
            // one point per cell, so no same-box ties can arise
            let points: Vec<Solution> = cells
                .iter()
                .map(|&(x, y)| point(&[x as f64 + 0.5, y as f64 + 0.5]))
                .collect();
            let mut shuffled = points.clone();
            let mut rng = crate::random::create_rng(seed);
            shuffled.shuffle(&mut rng);

            let eps = Epsilons::uniform(1.0).unwrap();
            let forward = EpsilonBoxArchive::with_solutions(eps.clone(), points);
            let reordered = EpsilonBoxArchive::with_solutions(eps, shuffled);

            let mut a: Vec<BoxIndex> = forward.iter().map(|s| forward.box_index(s)).collect();
            let mut b: Vec<BoxIndex> = reordered.iter().map(|s| reordered.box_index(s)).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }
    }
}
