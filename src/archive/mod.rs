//! Epsilon-dominance archive.
//!
//! The archive keeps the run's best approximation of the Pareto front. It
//! discretizes objective space into boxes of size epsilon per objective and
//! keeps at most one non-dominated representative per box.
//!
//! # Key Types
//!
//! - [`Epsilons`]: validated per-objective grid resolution
//! - [`EpsilonBoxArchive`]: the archive itself
//! - [`Insertion`]: what an insertion did (rejected, filled a box, improved)
//! - [`SharedArchive`]: mutex-guarded handle for concurrent feeders

mod epsilon_box;
mod epsilons;
mod shared;

pub use epsilon_box::{EpsilonBoxArchive, Insertion};
pub use epsilons::{BoxIndex, Epsilons};
pub use shared::SharedArchive;
