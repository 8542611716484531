//! Shared data types: solutions, problems, and dominance.
//!
//! - [`Solution`]: decision vector, objectives, constraints, provenance tags
//! - [`Problem`]: the external evaluation contract
//! - [`Population`]: steady-state working population
//! - [`dominance`]: constraint-first Pareto comparison used by every other
//!   component

mod dominance;
mod population;
mod problem;
mod solution;

pub use dominance::{
    crowding_distance, dominance, non_dominated_sort, pareto_dominance, rank_and_crowd_order,
    Dominance, NondominatedSortResult,
};
pub use population::Population;
pub use problem::{
    evaluate_batch, evaluate_solution, random_solution, validate_problem, variable_bounds,
    Evaluation, Problem,
};
pub use solution::{AttributeValue, Solution, OPERATOR_ATTRIBUTE};
