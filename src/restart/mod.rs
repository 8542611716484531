//! Restart control.
//!
//! Borg watches two signals: whether the epsilon-box archive keeps
//! improving, and whether the population size still matches the archive
//! size. Stagnation triggers a hard restart that rebuilds the population
//! from the archive; a size mismatch triggers a soft restart that only
//! resizes it. Listeners are told the new population size so that
//! size-dependent components, such as the tournament size, can follow.
//!
//! # References
//!
//! - Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//!   Evolutionary Computing Framework", Sections 3.1–3.2
//! - Hadka & Reed (2012), "Diagnostic Assessment of Search Controls and
//!   Failure Modes in Many-Objective Evolutionary Optimization"

mod config;
mod controller;

pub use config::RestartConfig;
pub use controller::{RestartController, RestartEvent, RestartKind};
