//! Restart controller configuration.

use crate::error::ConfigError;

/// Configuration for [`RestartController`](super::RestartController).
///
/// The target population size tracks the archive:
/// `clamp(archive_size / injection_rate, min_population_size, max_population_size)`.
///
/// # Examples
///
/// ```
/// use u_moea::restart::RestartConfig;
///
/// let config = RestartConfig::default()
///     .with_window_size(50)
///     .with_population_bounds(20, 2000)
///     .with_injection_rate(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestartConfig {
    /// Generations between two restart checks.
    pub window_size: usize,

    /// Generations after which a hard restart is forced even if the archive
    /// is still improving.
    pub max_window_size: usize,

    /// Fraction of the rebuilt population that comes from the archive, in
    /// (0, 1].
    pub injection_rate: f64,

    pub min_population_size: usize,

    pub max_population_size: usize,

    /// Relative deviation from the target size that triggers a soft restart.
    pub ratio_tolerance: f64,

    /// Per-variable uniform mutation rate for restart mutants.
    /// `None` uses `1 / number_of_variables`.
    pub mutation_rate: Option<f64>,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            max_window_size: 10_000,
            injection_rate: 0.25,
            min_population_size: 100,
            max_population_size: 10_000,
            ratio_tolerance: 0.25,
            mutation_rate: None,
        }
    }
}

impl RestartConfig {
    pub fn with_window_size(mut self, generations: usize) -> Self {
        self.window_size = generations;
        self
    }

    pub fn with_max_window_size(mut self, generations: usize) -> Self {
        self.max_window_size = generations;
        self
    }

    pub fn with_injection_rate(mut self, rate: f64) -> Self {
        self.injection_rate = rate;
        self
    }

    pub fn with_population_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_population_size = min;
        self.max_population_size = max;
        self
    }

    pub fn with_ratio_tolerance(mut self, tolerance: f64) -> Self {
        self.ratio_tolerance = tolerance;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate.clamp(0.0, 1.0));
        self
    }

    /// Target population size for an archive of `archive_size` members.
    pub fn target_population_size(&self, archive_size: usize) -> usize {
        let raw = (archive_size as f64 / self.injection_rate).floor() as usize;
        raw.clamp(self.min_population_size, self.max_population_size)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindow("window_size"));
        }
        if self.max_window_size == 0 {
            return Err(ConfigError::InvalidWindow("max_window_size"));
        }
        if !(self.injection_rate > 0.0 && self.injection_rate <= 1.0) {
            return Err(ConfigError::InvalidInjectionRate);
        }
        if self.min_population_size == 0 || self.min_population_size > self.max_population_size {
            return Err(ConfigError::PopulationBounds {
                min: self.min_population_size,
                max: self.max_population_size,
            });
        }
        if !(self.ratio_tolerance.is_finite() && self.ratio_tolerance >= 0.0) {
            return Err(ConfigError::InvalidRatioTolerance);
        }
        if let Some(rate) = self.mutation_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidOperator(format!(
                    "restart mutation rate must be in [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}
