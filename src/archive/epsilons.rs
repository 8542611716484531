//! Epsilon vectors and box indices.

use crate::error::ConfigError;

/// Per-objective grid resolution of an epsilon-box archive.
///
/// A single value applies to every objective. With more than one value,
/// objective `i` uses `values[i]`.
///
/// # Examples
///
/// ```
/// use u_moea::archive::Epsilons;
///
/// let eps = Epsilons::new(vec![0.1, 0.5]).unwrap();
/// assert_eq!(eps.box_index(&[1.05, 1.2]).as_slice(), &[10, 2]);
///
/// assert!(Epsilons::new(vec![0.1, 0.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsilons {
    values: Vec<f64>,
}

impl Epsilons {
    /// Creates an epsilon vector. Every entry must be finite and positive.
    pub fn new(values: Vec<f64>) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::EmptyEpsilons);
        }
        for (index, &value) in values.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidEpsilon { index, value });
            }
        }
        Ok(Self { values })
    }

    /// One epsilon shared by every objective.
    pub fn uniform(value: f64) -> Result<Self, ConfigError> {
        Self::new(vec![value])
    }

    /// Epsilon of objective `objective`.
    ///
    /// Objectives past the end of the vector reuse the last entry.
    pub fn get(&self, objective: usize) -> f64 {
        self.values[objective.min(self.values.len() - 1)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks that this vector fits a problem with `objectives` objectives:
    /// either one shared value or exactly one value per objective.
    pub fn check_dimension(&self, objectives: usize) -> Result<(), ConfigError> {
        if self.values.len() == 1 || self.values.len() == objectives {
            Ok(())
        } else {
            Err(ConfigError::EpsilonDimension {
                expected: objectives,
                actual: self.values.len(),
            })
        }
    }

    /// Box index of an objective vector: `floor(objective[i] / epsilon[i])`.
    pub fn box_index(&self, objectives: &[f64]) -> BoxIndex {
        BoxIndex(
            objectives
                .iter()
                .enumerate()
                .map(|(i, &value)| (value / self.get(i)).floor() as i64)
                .collect(),
        )
    }
}

impl Default for Epsilons {
    /// `0.01` for every objective.
    fn default() -> Self {
        Self { values: vec![0.01] }
    }
}

/// Integer coordinates of an epsilon box.
///
/// Two solutions with the same box index are epsilon-equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxIndex(Vec<i64>);

impl BoxIndex {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}
