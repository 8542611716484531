//! Parent selection.
//!
//! Borg draws parents from both the population and the archive: the archive
//! supplies elite, diverse parents while the population keeps the search
//! local to the current generation.

use rand::Rng;

use crate::archive::EpsilonBoxArchive;
use crate::core::{dominance, Dominance, Solution};

/// Minimum tournament size.
pub const MIN_TOURNAMENT_SIZE: usize = 2;

/// How parents are drawn for one variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Dominance tournaments: `arity / 2` parents from the archive and the
    /// rest from the population.
    Tournament,
    /// One archive member followed by population members drawn without
    /// replacement, the layout differential evolution expects.
    DifferentialEvolution,
    /// Uniform draws from the population.
    Uniform,
}

impl Selection {
    /// Draws `arity` parents.
    ///
    /// An empty archive is treated as absent and every parent comes from the
    /// population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<'a, R: Rng>(
        &self,
        arity: usize,
        population: &'a [Solution],
        archive: &'a EpsilonBoxArchive,
        tournament_size: usize,
        rng: &mut R,
    ) -> Vec<&'a Solution> {
        assert!(!population.is_empty(), "cannot select from an empty population");

        match self {
            Selection::Tournament => {
                let from_archive = if archive.is_empty() { 0 } else { arity / 2 };
                let archive_members: Vec<&Solution> = archive.iter().collect();

                let mut parents = Vec::with_capacity(arity);
                for _ in 0..from_archive {
                    parents.push(tournament(&archive_members, tournament_size, rng));
                }
                let population_members: Vec<&Solution> = population.iter().collect();
                for _ in from_archive..arity {
                    parents.push(tournament(&population_members, tournament_size, rng));
                }
                parents
            }
            Selection::DifferentialEvolution => {
                let mut parents = Vec::with_capacity(arity);
                let mut pool = arity;
                if !archive.is_empty() && arity > 0 {
                    let pick = rng.random_range(0..archive.len());
                    parents.extend(archive.get(pick));
                    pool -= 1;
                }
                parents.extend(distinct(population, pool, rng));
                parents
            }
            Selection::Uniform => (0..arity)
                .map(|_| &population[rng.random_range(0..population.len())])
                .collect(),
        }
    }
}

/// Dominance tournament of `size` uniform draws. Ties keep the earlier
/// winner.
fn tournament<'a, R: Rng>(pool: &[&'a Solution], size: usize, rng: &mut R) -> &'a Solution {
    let mut winner = pool[rng.random_range(0..pool.len())];
    for _ in 1..size.max(1) {
        let candidate = pool[rng.random_range(0..pool.len())];
        if dominance(candidate, winner) == Dominance::Dominates {
            winner = candidate;
        }
    }
    winner
}

/// `count` members without replacement while the population allows it,
/// with replacement once it is exhausted.
fn distinct<'a, R: Rng>(population: &'a [Solution], count: usize, rng: &mut R) -> Vec<&'a Solution> {
    let n = population.len();
    if count > n {
        return (0..count)
            .map(|_| &population[rng.random_range(0..n)])
            .collect();
    }
    rand::seq::index::sample(rng, n, count)
        .into_iter()
        .map(|i| &population[i])
        .collect()
}

/// Tournament size for a population: `max(population * ratio, 2)`.
pub fn tournament_size(population_size: usize, selection_ratio: f64) -> usize {
    ((population_size as f64 * selection_ratio) as usize).max(MIN_TOURNAMENT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Epsilons;
    use crate::random::create_rng;

    fn population() -> Vec<Solution> {
        (0..10)
            .map(|i| Solution::evaluated(vec![i as f64], vec![i as f64, 10.0 - i as f64], vec![]))
            .collect()
    }

    fn archive_with(points: &[[f64; 2]]) -> EpsilonBoxArchive {
        EpsilonBoxArchive::with_solutions(
            Epsilons::uniform(0.01).unwrap(),
            points
                .iter()
                .map(|p| Solution::evaluated(vec![-1.0], p.to_vec(), vec![])),
        )
    }

    fn from_archive(s: &Solution) -> bool {
        s.variables() == [-1.0]
    }

    #[test]
    fn test_tournament_splits_archive_and_population() {
        let mut rng = create_rng(42);
        let pop = population();
        let archive = archive_with(&[[0.0, 0.0]]);

        for _ in 0..50 {
            let parents = Selection::Tournament.select(2, &pop, &archive, 2, &mut rng);
            assert_eq!(parents.len(), 2);
            assert_eq!(parents.iter().filter(|p| from_archive(p)).count(), 1);
        }
    }

    #[test]
    fn test_tournament_empty_archive_uses_population() {
        let mut rng = create_rng(1);
        let pop = population();
        let archive = EpsilonBoxArchive::new(Epsilons::uniform(0.1).unwrap());
        let parents = Selection::Tournament.select(2, &pop, &archive, 3, &mut rng);
        assert_eq!(parents.len(), 2);
        assert!(parents.iter().all(|p| !from_archive(p)));
    }

    #[test]
    fn test_tournament_prefers_dominating() {
        let mut rng = create_rng(7);
        let best = Solution::evaluated(vec![0.0], vec![0.0, 0.0], vec![]);
        let worse = Solution::evaluated(vec![1.0], vec![1.0, 1.0], vec![]);
        let pool = vec![&best, &worse];

        // with a large tournament the dominating member is almost surely drawn
        let wins = (0..100)
            .filter(|_| std::ptr::eq(tournament(&pool, 64, &mut rng), &best))
            .count();
        assert_eq!(wins, 100);
    }

    #[test]
    fn test_de_selection_layout() {
        let mut rng = create_rng(3);
        let pop = population();
        let archive = archive_with(&[[0.0, 0.5], [0.5, 0.0]]);

        for _ in 0..50 {
            let parents = Selection::DifferentialEvolution.select(4, &pop, &archive, 2, &mut rng);
            assert_eq!(parents.len(), 4);
            assert!(from_archive(parents[0]));
            let mut rest: Vec<f64> = parents[1..].iter().map(|p| p.variables()[0]).collect();
            rest.sort_by(|a, b| a.partial_cmp(b).unwrap());
            rest.dedup();
            assert_eq!(rest.len(), 3, "population parents must be distinct");
        }
    }

    #[test]
    fn test_de_selection_small_population() {
        let mut rng = create_rng(3);
        let pop = vec![Solution::from_objectives(vec![1.0, 1.0])];
        let archive = EpsilonBoxArchive::new(Epsilons::uniform(0.1).unwrap());
        let parents = Selection::DifferentialEvolution.select(4, &pop, &archive, 2, &mut rng);
        assert_eq!(parents.len(), 4);
    }

    #[test]
    fn test_uniform_selection() {
        let mut rng = create_rng(11);
        let pop = population();
        let archive = archive_with(&[[0.0, 0.0]]);
        let parents = Selection::Uniform.select(3, &pop, &archive, 2, &mut rng);
        assert_eq!(parents.len(), 3);
        assert!(parents.iter().all(|p| !from_archive(p)));
    }

    #[test]
    fn test_tournament_size() {
        assert_eq!(tournament_size(100, 0.02), 2);
        assert_eq!(tournament_size(10, 0.02), 2);
        assert_eq!(tournament_size(1000, 0.02), 20);
    }
}
