//! Adaptive operator selection.

use rand::Rng;

use super::config::{CreditPolicy, SelectorConfig};
use crate::archive::EpsilonBoxArchive;
use crate::error::ConfigError;
use crate::operators::Operator;

/// Sum of moving averages at or below which the selector restarts from
/// uniform credit.
const STAGNATION_THRESHOLD: f64 = 0.05;

const SUM_TOLERANCE: f64 = 1e-9;

/// Per-operator statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRecord {
    operator: Operator,
    current_count: usize,
    moving_average: f64,
    probability: f64,
}

impl OperatorRecord {
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Archive admissions credited since the last update.
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    pub fn moving_average(&self) -> f64 {
        self.moving_average
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// Chooses which operator produces the next offspring.
///
/// Operators are credited when their offspring enter the archive, and
/// selection probabilities follow the credit. The operator list is fixed at
/// construction.
///
/// # Examples
///
/// ```
/// use u_moea::adaptive::{OperatorSelector, SelectorConfig};
/// use u_moea::archive::{EpsilonBoxArchive, Epsilons};
/// use u_moea::operators::borg_operators;
///
/// let mut selector =
///     OperatorSelector::new(borg_operators(10)[..3].to_vec(), SelectorConfig::default()).unwrap();
/// let archive = EpsilonBoxArchive::new(Epsilons::uniform(0.1).unwrap());
///
/// for _ in 0..10 {
///     selector.record_acceptance(0);
/// }
/// selector.update(&archive);
///
/// assert!((selector.probability(0) - 0.9).abs() < 1e-9);
/// assert!((selector.probability(1) - 0.05).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct OperatorSelector {
    records: Vec<OperatorRecord>,
    config: SelectorConfig,
    updates: usize,
}

impl OperatorSelector {
    /// Creates a selector with uniform probabilities.
    pub fn new(operators: Vec<Operator>, config: SelectorConfig) -> Result<Self, ConfigError> {
        config.validate(operators.len())?;
        for operator in &operators {
            operator.validate()?;
        }

        let uniform = 1.0 / operators.len() as f64;
        let records = operators
            .into_iter()
            .map(|operator| OperatorRecord {
                operator,
                current_count: 0,
                moving_average: 0.0,
                probability: uniform,
            })
            .collect();

        Ok(Self {
            records,
            config,
            updates: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn operator(&self, index: usize) -> &Operator {
        &self.records[index].operator
    }

    pub fn records(&self) -> &[OperatorRecord] {
        &self.records
    }

    /// Selection probability of operator `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.records[index].probability
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.probability).collect()
    }

    /// Roulette draw over the current probabilities.
    pub fn select_operator<R: Rng>(&self, rng: &mut R) -> usize {
        let draw = rng.random::<f64>();
        roulette(self.records.iter().map(|r| r.probability), draw, self.records.len())
    }

    /// Credits operator `index` with one archive admission.
    ///
    /// Ignored by the census policy, which reads credit from the archive.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn record_acceptance(&mut self, index: usize) {
        assert!(
            index < self.records.len(),
            "operator index {index} out of range for {} operators",
            self.records.len()
        );
        self.records[index].current_count += 1;
    }

    /// End-of-generation update.
    pub fn update(&mut self, archive: &EpsilonBoxArchive) {
        self.updates += 1;

        match self.config.policy {
            CreditPolicy::MovingAverage => self.update_moving_average(),
            CreditPolicy::ArchiveCensus { window } => {
                for record in &mut self.records {
                    record.current_count = 0;
                }
                if self.updates % window == 0 {
                    self.update_census(archive);
                }
            }
        }

        let sum: f64 = self.records.iter().map(|r| r.probability).sum();
        assert!(
            (sum - 1.0).abs() < SUM_TOLERANCE,
            "operator probabilities sum to {sum}"
        );
        log::trace!("operator probabilities: {:?}", self.probabilities());
    }

    /// Forgets all credit and returns to uniform probabilities.
    pub fn reset(&mut self) {
        let uniform = 1.0 / self.records.len() as f64;
        for record in &mut self.records {
            record.current_count = 0;
            record.moving_average = 0.0;
            record.probability = uniform;
        }
        self.updates = 0;
        log::debug!("operator selector reset to uniform");
    }

    fn update_moving_average(&mut self) {
        let alpha = self.config.smoothing;
        for record in &mut self.records {
            record.moving_average =
                alpha * record.current_count as f64 + (1.0 - alpha) * record.moving_average;
            record.current_count = 0;
        }

        if self.records.iter().map(|r| r.moving_average).sum::<f64>() <= STAGNATION_THRESHOLD {
            for record in &mut self.records {
                record.moving_average = 1.0;
            }
        }

        let total: f64 = self.records.iter().map(|r| r.moving_average).sum();
        let mut probabilities: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.moving_average / total)
            .collect();
        apply_floor(&mut probabilities, self.config.probability_floor);

        for (record, p) in self.records.iter_mut().zip(probabilities) {
            record.probability = p;
        }
    }

    fn update_census(&mut self, archive: &EpsilonBoxArchive) {
        let mut counts = vec![1.0; self.records.len()];
        for member in archive.iter() {
            if let Some(i) = member.operator_index() {
                if let Some(count) = counts.get_mut(i) {
                    *count += 1.0;
                }
            }
        }
        let total: f64 = counts.iter().sum();
        for (record, count) in self.records.iter_mut().zip(counts) {
            record.probability = count / total;
        }
    }
}

/// Returns the first index whose cumulative probability exceeds `draw`.
///
/// Rounding can leave the cumulative sum just under a draw close to one; the
/// last index is returned then.
fn roulette(probabilities: impl Iterator<Item = f64>, draw: f64, len: usize) -> usize {
    let mut cumulative = 0.0;
    for (i, p) in probabilities.enumerate() {
        cumulative += p;
        if cumulative > draw {
            return i;
        }
    }
    len - 1 // floating-point fallback
}

/// Raises every probability below `floor` to `floor` and takes the raised
/// mass from the entries above it, in proportion to their excess.
///
/// Requires `floor * len <= 1` and a probability vector summing to one.
fn apply_floor(probabilities: &mut [f64], floor: f64) {
    let mut raised = 0.0;
    for p in probabilities.iter_mut() {
        if *p < floor {
            raised += floor - *p;
            *p = floor;
        }
    }
    if raised <= 0.0 {
        return;
    }

    let excess: f64 = probabilities
        .iter()
        .filter(|&&p| p > floor)
        .map(|&p| p - floor)
        .sum();
    if excess <= 0.0 {
        return;
    }
    for p in probabilities.iter_mut() {
        if *p > floor {
            *p -= raised * (*p - floor) / excess;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
