//! Dominance relations.
//!
//! Constraint violation takes precedence over objectives: when either
//! solution is infeasible the one with lower aggregate violation wins; when
//! the violations are equal (both feasible, or equally infeasible) the
//! objectives decide by Pareto dominance. All objectives are **minimized**.
//!
//! Also provides fast non-dominated sorting and crowding distance, used when
//! a population has to shrink without discarding its best members.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::solution::Solution;

/// Outcome of comparing a left solution with a right solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Dominates,
    /// Right dominates left.
    DominatedBy,
    /// Neither dominates the other.
    NonDominated,
}

/// Pareto dominance between two objective vectors.
///
/// `a` dominates `b` iff it is no worse in every objective and strictly
/// better in at least one. Identical vectors are non-dominated.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors differ in length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::DominatedBy,
        _ => Dominance::NonDominated,
    }
}

/// Constraint-first dominance between two evaluated solutions.
///
/// # Example
///
/// ```
/// use u_moea::core::{dominance, Dominance, Solution};
///
/// let feasible = Solution::evaluated(vec![], vec![9.0, 9.0], vec![0.0]);
/// let infeasible = Solution::evaluated(vec![], vec![1.0, 1.0], vec![0.5]);
/// assert_eq!(dominance(&feasible, &infeasible), Dominance::Dominates);
/// ```
pub fn dominance(a: &Solution, b: &Solution) -> Dominance {
    if !a.is_feasible() || !b.is_feasible() {
        let cv_a = a.constraint_violation();
        let cv_b = b.constraint_violation();
        if cv_a < cv_b {
            return Dominance::Dominates;
        } else if cv_b < cv_a {
            return Dominance::DominatedBy;
        }
    }
    pareto_dominance(a.objectives(), b.objectives())
}

/// Result of non-dominated sorting.
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Rank of each solution (0 = non-dominated front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` holds the rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting under [`dominance`].
///
/// O(m * n²) for n solutions with m objectives.
pub fn non_dominated_sort(solutions: &[Solution]) -> NondominatedSortResult {
    let n = solutions.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&solutions[i], &solutions[j]) {
                Dominance::Dominates => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::DominatedBy => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::NonDominated => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = vec![front_0];
    loop {
        let current = fronts.last().expect("fronts starts with front 0");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each objective vector within its set.
///
/// Boundary points of any objective receive `f64::INFINITY`; larger values
/// mean more isolated points.
pub fn crowding_distance(objectives: &[&[f64]]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    let mut indices: Vec<usize> = (0..n).collect();

    for obj in 0..m {
        indices.sort_by(|&a, &b| {
            objectives[a][obj]
                .partial_cmp(&objectives[b][obj])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = objectives[indices[n - 1]][obj] - objectives[indices[0]][obj];
        if range > 0.0 {
            for w in indices.windows(3) {
                let gap = objectives[w[2]][obj] - objectives[w[0]][obj];
                distances[w[1]] += gap / range;
            }
        }
    }

    distances
}

/// Indices of `solutions` ordered best-first: lower rank, then larger
/// crowding distance.
pub fn rank_and_crowd_order(solutions: &[Solution]) -> Vec<usize> {
    let sorted = non_dominated_sort(solutions);
    let mut order = Vec::with_capacity(solutions.len());

    for front in &sorted.fronts {
        let objectives: Vec<&[f64]> = front.iter().map(|&i| solutions[i].objectives()).collect();
        let distances = crowding_distance(&objectives);
        let mut ranked: Vec<(usize, f64)> = front.iter().copied().zip(distances).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        order.extend(ranked.into_iter().map(|(i, _)| i));
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objs(values: &[f64]) -> Solution {
        Solution::from_objectives(values.to_vec())
    }

    #[test]
    fn test_pareto_dominance() {
        assert_eq!(pareto_dominance(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Dominates);
        assert_eq!(pareto_dominance(&[1.0, 2.0], &[1.0, 1.0]), Dominance::DominatedBy);
        assert_eq!(pareto_dominance(&[1.0, 3.0], &[3.0, 1.0]), Dominance::NonDominated);
        assert_eq!(pareto_dominance(&[2.0, 2.0], &[2.0, 2.0]), Dominance::NonDominated);
    }

    #[test]
    fn test_constraints_take_precedence() {
        let good_objectives = Solution::evaluated(vec![], vec![0.0, 0.0], vec![1.0]);
        let less_violating = Solution::evaluated(vec![], vec![5.0, 5.0], vec![0.5]);
        assert_eq!(
            dominance(&less_violating, &good_objectives),
            Dominance::Dominates
        );
        assert_eq!(
            dominance(&good_objectives, &less_violating),
            Dominance::DominatedBy
        );
    }

    #[test]
    fn test_equal_violation_falls_back_to_objectives() {
        let a = Solution::evaluated(vec![], vec![1.0, 1.0], vec![0.5]);
        let b = Solution::evaluated(vec![], vec![2.0, 2.0], vec![-0.5]);
        assert_eq!(dominance(&a, &b), Dominance::Dominates);
    }

    #[test]
    fn test_sort_mixed_fronts() {
        let pop = vec![
            objs(&[1.0, 5.0]),
            objs(&[3.0, 3.0]),
            objs(&[5.0, 1.0]),
            objs(&[4.0, 4.0]), // dominated by (3,3)
            objs(&[6.0, 6.0]), // dominated by (4,4)
        ];
        let result = non_dominated_sort(&pop);
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
        assert_eq!(result.fronts.len(), 3);
    }

    #[test]
    fn test_sort_empty() {
        let result = non_dominated_sort(&[]);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let points: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64, 4.0 - i as f64]).collect();
        let refs: Vec<&[f64]> = points.iter().map(Vec::as_slice).collect();
        let dist = crowding_distance(&refs);

        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        assert!((dist[1] - dist[2]).abs() < 1e-10);
        assert!((dist[2] - dist[3]).abs() < 1e-10);
    }

    #[test]
    fn test_crowding_zero_range() {
        let points = [vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let refs: Vec<&[f64]> = points.iter().map(Vec::as_slice).collect();
        let dist = crowding_distance(&refs);
        assert!(dist[1].is_finite());
    }

    #[test]
    fn test_rank_and_crowd_order_puts_dominated_last() {
        let pop = vec![
            objs(&[6.0, 6.0]),
            objs(&[1.0, 5.0]),
            objs(&[3.0, 3.0]),
            objs(&[5.0, 1.0]),
        ];
        let order = rank_and_crowd_order(&pop);
        assert_eq!(order.len(), 4);
        assert_eq!(*order.last().unwrap(), 0);
        // boundary points of the first front come before the interior one
        assert_eq!(order[2], 2);
    }
}
