//! Self-adaptive multi-objective evolutionary search.
//!
//! Implements the machinery that makes Borg-class MOEAs self-adaptive:
//!
//! - **Epsilon-dominance archive**: keeps one non-dominated representative
//!   per epsilon box of objective space; its size bounds itself.
//! - **Adaptive operator selection**: several variation operators run side
//!   by side, and search effort shifts toward those whose offspring enter
//!   the archive.
//! - **Restarts**: stagnation of the archive or a population size that no
//!   longer fits the archive triggers a hard or soft restart seeded from the
//!   archive.
//! - **Borg runner**: the steady-state loop tying the three together.
//!
//! # Architecture
//!
//! The archive, selector and restart controller share mutable state and run
//! on a single control thread. Objective evaluation is the only parallel
//! step (`parallel` feature): a batch of offspring is evaluated on the rayon
//! pool and the results are applied on the control thread before the next
//! generation.
//!
//! # Features
//!
//! - `parallel`: rayon batch evaluation
//! - `serde`: `Serialize`/`Deserialize` for solutions, configurations and
//!   results

pub mod adaptive;
pub mod archive;
pub mod borg;
pub mod core;
pub mod error;
pub mod operators;
pub mod random;
pub mod restart;

pub use error::ConfigError;
