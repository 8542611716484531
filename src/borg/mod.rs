//! Borg multi-objective evolutionary algorithm.
//!
//! A steady-state, epsilon-dominance MOEA that adapts itself while it runs:
//!
//! - offspring come from several operators whose selection probabilities
//!   follow their recent success in the archive ([`crate::adaptive`]);
//! - stagnation and population-sizing drift trigger restarts that reseed
//!   the population from the archive ([`crate::restart`]);
//! - the epsilon-box archive ([`crate::archive`]) is the result.
//!
//! # Key Types
//!
//! - [`BorgConfig`]: run parameters and presets
//! - [`BorgRunner`]: executes the main loop
//! - [`BorgResult`]: archive snapshot and run statistics
//!
//! # References
//!
//! - Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//!   Evolutionary Computing Framework", Evolutionary Computation 21(2)
//! - Deb, Mohan & Mishra (2005), "Evaluating the epsilon-Domination Based
//!   Multi-Objective Evolutionary Algorithm for a Quick Computation of
//!   Pareto-Optimal Solutions"

mod config;
mod runner;

pub use config::BorgConfig;
pub use runner::{BorgResult, BorgRunner};
