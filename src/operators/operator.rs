//! Selection + variation pairs.

use rand::Rng;

use super::selection::Selection;
use super::variation::{De, Pm, Sbx, Um, Variation};
use crate::archive::EpsilonBoxArchive;
use crate::core::Solution;
use crate::error::ConfigError;

/// One entry of the adaptive operator set: how parents are drawn and how
/// they are recombined.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    pub selection: Selection,
    pub variation: Variation,
}

impl Operator {
    pub fn new(selection: Selection, variation: Variation) -> Self {
        Self {
            selection,
            variation,
        }
    }

    pub fn name(&self) -> &'static str {
        self.variation.name()
    }

    pub fn arity(&self) -> usize {
        self.variation.arity()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.variation.validate()
    }

    /// Selects parents and produces unevaluated offspring.
    pub fn apply<R: Rng>(
        &self,
        population: &[Solution],
        archive: &EpsilonBoxArchive,
        tournament_size: usize,
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> Vec<Solution> {
        let parents = self
            .selection
            .select(self.arity(), population, archive, tournament_size, rng);
        self.variation.evolve(&parents, bounds, rng)
    }
}

/// The default Borg operator set for a problem with `variables` decision
/// variables.
///
/// | # | selection | variation |
/// |---|-----------|-----------|
/// | 0 | tournament | SBX (rate 1.0, index 15) + PM |
/// | 1 | DE | DE (CR 0.1, F 0.5) + PM |
/// | 2 | tournament | PM (rate 1/n, index 20) |
/// | 3 | tournament | UM (rate 1/n) |
pub fn borg_operators(variables: usize) -> Vec<Operator> {
    let pm = Pm::for_variables(variables);
    vec![
        Operator::new(Selection::Tournament, Variation::SbxPm(Sbx::default(), pm)),
        Operator::new(
            Selection::DifferentialEvolution,
            Variation::DePm(De::default(), pm),
        ),
        Operator::new(Selection::Tournament, Variation::Pm(pm)),
        Operator::new(
            Selection::Tournament,
            Variation::Um(Um::for_variables(variables)),
        ),
    ]
}
