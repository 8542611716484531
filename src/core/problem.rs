//! Problem definition and batch evaluation.
//!
//! The search core never looks inside a [`Problem`]: it only needs to know
//! the dimensions, the variable bounds, and how to turn a decision vector
//! into an [`Evaluation`]. Evaluation is a pure function of the decision
//! vector, so batches may be evaluated on a rayon pool when the `parallel`
//! feature is enabled.

use rand::Rng;

use super::solution::Solution;
use crate::error::ConfigError;

/// Objective and constraint values produced by [`Problem::evaluate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Objective values, minimized.
    pub objectives: Vec<f64>,
    /// Constraint values, `0.0` meaning satisfied.
    pub constraints: Vec<f64>,
}

impl Evaluation {
    /// An evaluation with no constraints.
    pub fn unconstrained(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints: Vec::new(),
        }
    }
}

/// A multi-objective optimization problem over real-valued variables.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` because offspring batches may be
/// evaluated in parallel.
///
/// # Example
///
/// ```
/// use u_moea::core::{Evaluation, Problem};
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn bounds(&self, _index: usize) -> (f64, f64) { (-10.0, 10.0) }
///     fn evaluate(&self, x: &[f64]) -> Evaluation {
///         Evaluation::unconstrained(vec![x[0] * x[0], (x[0] - 2.0).powi(2)])
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Number of decision variables.
    fn number_of_variables(&self) -> usize;

    /// Number of objectives (M).
    fn number_of_objectives(&self) -> usize;

    /// Number of constraints (C). Defaults to zero.
    fn number_of_constraints(&self) -> usize {
        0
    }

    /// Lower and upper bound of variable `index`.
    fn bounds(&self, index: usize) -> (f64, f64);

    /// Evaluates a decision vector.
    ///
    /// Failures must be resolved here (retried, penalized through a
    /// constraint, ...): a solution is never handed back half-evaluated.
    fn evaluate(&self, variables: &[f64]) -> Evaluation;
}

/// Collects the variable bounds of `problem` into a vector.
pub fn variable_bounds<P: Problem + ?Sized>(problem: &P) -> Vec<(f64, f64)> {
    (0..problem.number_of_variables())
        .map(|i| problem.bounds(i))
        .collect()
}

/// Checks that a problem's dimensions and bounds are usable.
pub fn validate_problem<P: Problem + ?Sized>(problem: &P) -> Result<(), ConfigError> {
    if problem.number_of_variables() == 0 {
        return Err(ConfigError::InvalidProblem(
            "at least one decision variable is required".into(),
        ));
    }
    if problem.number_of_objectives() == 0 {
        return Err(ConfigError::InvalidProblem(
            "at least one objective is required".into(),
        ));
    }
    for i in 0..problem.number_of_variables() {
        let (lo, hi) = problem.bounds(i);
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            return Err(ConfigError::InvalidProblem(format!(
                "variable {i} has invalid bounds [{lo}, {hi}]"
            )));
        }
    }
    Ok(())
}

/// Creates an unevaluated solution sampled uniformly within the bounds.
pub fn random_solution<R: Rng>(bounds: &[(f64, f64)], rng: &mut R) -> Solution {
    let variables = bounds
        .iter()
        .map(|&(lo, hi)| {
            if hi > lo {
                rng.random_range(lo..hi)
            } else {
                lo
            }
        })
        .collect();
    Solution::new(variables)
}

/// Evaluates a single solution in place.
///
/// # Panics
/// Panics if the evaluation has the wrong number of objectives or
/// constraints.
pub fn evaluate_solution<P: Problem + ?Sized>(problem: &P, solution: &mut Solution) {
    let evaluation = problem.evaluate(solution.variables());
    assert_eq!(
        evaluation.objectives.len(),
        problem.number_of_objectives(),
        "problem returned the wrong number of objectives"
    );
    assert_eq!(
        evaluation.constraints.len(),
        problem.number_of_constraints(),
        "problem returned the wrong number of constraints"
    );
    solution.apply_evaluation(evaluation);
}

/// Evaluates every solution in `batch`.
///
/// With the `parallel` feature and `parallel == true` the batch is spread
/// over the rayon pool; the call returns once every evaluation finished.
pub fn evaluate_batch<P: Problem + ?Sized>(problem: &P, batch: &mut [Solution], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            batch
                .par_iter_mut()
                .for_each(|solution| evaluate_solution(problem, solution));
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for solution in batch.iter_mut() {
        evaluate_solution(problem, solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    struct Square;

    impl Problem for Square {
        fn number_of_variables(&self) -> usize {
            2
        }
        fn number_of_objectives(&self) -> usize {
            2
        }
        fn number_of_constraints(&self) -> usize {
            1
        }
        fn bounds(&self, _index: usize) -> (f64, f64) {
            (0.0, 1.0)
        }
        fn evaluate(&self, x: &[f64]) -> Evaluation {
            Evaluation {
                objectives: vec![x[0] * x[0], x[1] * x[1]],
                constraints: vec![(x[0] + x[1] - 1.5).max(0.0)],
            }
        }
    }

    struct NoBounds;

    impl Problem for NoBounds {
        fn number_of_variables(&self) -> usize {
            1
        }
        fn number_of_objectives(&self) -> usize {
            1
        }
        fn bounds(&self, _index: usize) -> (f64, f64) {
            (1.0, 0.0)
        }
        fn evaluate(&self, x: &[f64]) -> Evaluation {
            Evaluation::unconstrained(vec![x[0]])
        }
    }

    #[test]
    fn test_random_solution_within_bounds() {
        let mut rng = create_rng(42);
        let bounds = vec![(-1.0, 1.0), (5.0, 6.0), (3.0, 3.0)];
        for _ in 0..100 {
            let s = random_solution(&bounds, &mut rng);
            assert!((-1.0..1.0).contains(&s.variables()[0]));
            assert!((5.0..6.0).contains(&s.variables()[1]));
            assert_eq!(s.variables()[2], 3.0);
        }
    }

    #[test]
    fn test_evaluate_batch() {
        let mut batch: Vec<Solution> = vec![
            Solution::new(vec![0.5, 0.5]),
            Solution::new(vec![1.0, 1.0]),
        ];
        evaluate_batch(&Square, &mut batch, true);
        assert!(batch.iter().all(Solution::is_evaluated));
        assert!((batch[0].objectives()[0] - 0.25).abs() < 1e-12);
        assert!(batch[0].is_feasible());
        assert!((batch[1].constraint_violation() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate_problem() {
        assert!(validate_problem(&Square).is_ok());
        assert!(matches!(
            validate_problem(&NoBounds),
            Err(ConfigError::InvalidProblem(_))
        ));
    }
}
