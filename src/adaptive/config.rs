//! Operator selector configuration.

use crate::error::ConfigError;

/// How operators earn credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreditPolicy {
    /// Incremental: each archive admission credits the producing operator;
    /// credits are smoothed into a moving average once per generation and a
    /// probability floor is enforced.
    MovingAverage,
    /// Legacy: every `window` generations, probabilities are recomputed from
    /// a census of the archive's operator tags (`1 + count` per operator).
    /// No floor.
    ArchiveCensus { window: usize },
}

/// Configuration for [`OperatorSelector`](super::OperatorSelector).
///
/// # Examples
///
/// ```
/// use u_moea::adaptive::{CreditPolicy, SelectorConfig};
///
/// let config = SelectorConfig::default()
///     .with_smoothing(0.3)
///     .with_probability_floor(0.02);
/// assert!(config.validate(4).is_ok());
///
/// let legacy = SelectorConfig::default()
///     .with_policy(CreditPolicy::ArchiveCensus { window: 100 });
/// assert!(legacy.validate(4).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorConfig {
    pub policy: CreditPolicy,

    /// Weight of the latest generation in the moving average, in (0, 1].
    pub smoothing: f64,

    /// Minimum selection probability of every operator.
    ///
    /// Must satisfy `floor * operators <= 1`.
    pub probability_floor: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            policy: CreditPolicy::MovingAverage,
            smoothing: 0.2,
            probability_floor: 0.05,
        }
    }
}

impl SelectorConfig {
    pub fn with_policy(mut self, policy: CreditPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_smoothing(mut self, alpha: f64) -> Self {
        self.smoothing = alpha;
        self
    }

    pub fn with_probability_floor(mut self, floor: f64) -> Self {
        self.probability_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Validates the configuration for a selector over `operators` operators.
    pub fn validate(&self, operators: usize) -> Result<(), ConfigError> {
        if operators == 0 {
            return Err(ConfigError::NoOperators);
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::InvalidSmoothing);
        }
        let floor = self.probability_floor;
        if !(0.0..=1.0).contains(&floor) || floor * operators as f64 > 1.0 + 1e-12 {
            return Err(ConfigError::InvalidFloor { floor, operators });
        }
        if let CreditPolicy::ArchiveCensus { window: 0 } = self.policy {
            return Err(ConfigError::InvalidWindow("census window"));
        }
        Ok(())
    }
}
