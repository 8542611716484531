//! Adaptive operator selection.
//!
//! Borg runs several variation operators side by side and shifts search
//! effort toward whichever currently produces archive members. Each time an
//! offspring enters the archive, the operator that created it is credited;
//! once per generation the credit is turned into selection probabilities.
//!
//! # Policies
//!
//! - [`CreditPolicy::MovingAverage`]: exponential smoothing of per-generation
//!   admissions with a probability floor, so no operator is ever starved.
//! - [`CreditPolicy::ArchiveCensus`]: periodic recount of the operator tags
//!   carried by archive members.
//!
//! # References
//!
//! - Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//!   Evolutionary Computing Framework", Section 3.3
//! - Vrugt & Robinson (2007), "Improved evolutionary optimization from
//!   genetically adaptive multimethod search", PNAS 104(3)

mod config;
mod selector;

pub use config::{CreditPolicy, SelectorConfig};
pub use selector::{OperatorRecord, OperatorSelector};
