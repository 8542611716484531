//! Search operators.
//!
//! An [`Operator`] pairs a parent [`Selection`] strategy with a
//! [`Variation`] pipeline. The adaptive selector picks among a fixed list
//! of operators each time offspring are needed.
//!
//! # Built-in variations
//!
//! - SBX + PM (arity 2)
//! - DE + PM (arity 4)
//! - PM (arity 1)
//! - UM (arity 1), also used by restarts to perturb archive members

mod operator;
mod selection;
mod variation;

pub use operator::{borg_operators, Operator};
pub use selection::{tournament_size, Selection, MIN_TOURNAMENT_SIZE};
pub use variation::{
    differential_evolution, polynomial_mutation, sbx_crossover, uniform_mutation, De, Pm, Sbx, Um,
    Variation,
};
