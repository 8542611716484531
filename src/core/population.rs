//! Steady-state population.

use rand::Rng;

use super::dominance::{dominance, rank_and_crowd_order, Dominance};
use super::solution::Solution;

/// The working population of a Borg run.
///
/// Offspring enter through [`add`](Population::add), which follows the
/// epsilon-MOEA replacement rule. Restarts rebuild or resize it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Solution>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_solutions(members: Vec<Solution>) -> Self {
        Self { members }
    }

    /// Offers an evaluated offspring to the population.
    ///
    /// - If it dominates some members, it replaces one of them at random.
    /// - Else, if no member dominates it, it replaces a random member.
    /// - Else it is discarded.
    ///
    /// Returns `true` if the offspring was kept.
    pub fn add<R: Rng>(&mut self, solution: Solution, rng: &mut R) -> bool {
        if self.members.is_empty() {
            self.members.push(solution);
            return true;
        }

        let mut dominated = Vec::new();
        let mut is_dominated = false;
        for (i, member) in self.members.iter().enumerate() {
            match dominance(&solution, member) {
                Dominance::Dominates => dominated.push(i),
                Dominance::DominatedBy => is_dominated = true,
                Dominance::NonDominated => {}
            }
        }

        if !dominated.is_empty() {
            let slot = dominated[rng.random_range(0..dominated.len())];
            self.members[slot] = solution;
            true
        } else if !is_dominated {
            let slot = rng.random_range(0..self.members.len());
            self.members[slot] = solution;
            true
        } else {
            false
        }
    }

    /// Appends without any replacement rule.
    pub fn push(&mut self, solution: Solution) {
        self.members.push(solution);
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Shrinks to the `size` best members by non-dominated rank, then
    /// crowding distance.
    pub fn truncate_by_rank(&mut self, size: usize) {
        if self.members.len() <= size {
            return;
        }
        let keep: Vec<usize> = rank_and_crowd_order(&self.members)
            .into_iter()
            .take(size)
            .collect();
        let mut slots: Vec<Option<Solution>> = self.members.drain(..).map(Some).collect();
        self.members = keep.into_iter().filter_map(|i| slots[i].take()).collect();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn as_slice(&self) -> &[Solution] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Solution> + '_ {
        self.members.iter()
    }

    pub fn into_vec(self) -> Vec<Solution> {
        self.members
    }
}
