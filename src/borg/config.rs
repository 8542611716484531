//! Borg configuration.
//!
//! [`BorgConfig`] holds every parameter of a run: archive resolution,
//! population sizing, termination, and the nested selector and restart
//! configurations.

use crate::adaptive::SelectorConfig;
use crate::archive::Epsilons;
use crate::error::ConfigError;
use crate::restart::RestartConfig;

/// Configuration for the Borg MOEA.
///
/// # Defaults
///
/// ```
/// use u_moea::borg::BorgConfig;
///
/// let config = BorgConfig::default();
/// assert_eq!(config.initial_population_size, 100);
/// assert_eq!(config.max_evaluations, Some(10_000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::archive::Epsilons;
/// use u_moea::borg::BorgConfig;
///
/// let config = BorgConfig::default()
///     .with_epsilons(Epsilons::new(vec![0.01, 0.05]).unwrap())
///     .with_initial_population_size(200)
///     .with_max_evaluations(50_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorgConfig {
    /// Archive grid resolution.
    pub epsilons: Epsilons,

    /// Number of random solutions evaluated before the first generation.
    pub initial_population_size: usize,

    /// Tournament size as a fraction of the population size (at least 2).
    pub selection_ratio: f64,

    /// Operator applications per generation.
    ///
    /// All offspring of a generation are evaluated as one batch, which is
    /// what the `parallel` feature spreads over worker threads.
    pub offspring_batch: usize,

    /// Stop after this many problem evaluations.
    pub max_evaluations: Option<usize>,

    /// Stop after this many generations.
    pub max_generations: Option<usize>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation.
    pub time_limit_ms: Option<u64>,

    /// Whether to evaluate offspring batches in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    pub selector: SelectorConfig,

    pub restart: RestartConfig,
}

impl Default for BorgConfig {
    fn default() -> Self {
        Self {
            epsilons: Epsilons::default(),
            initial_population_size: 100,
            selection_ratio: 0.02,
            offspring_batch: 1,
            max_evaluations: Some(10_000),
            max_generations: None,
            time_limit_ms: None,
            parallel: true,
            seed: None,
            selector: SelectorConfig::default(),
            restart: RestartConfig::default(),
        }
    }
}

impl BorgConfig {
    pub fn with_epsilons(mut self, epsilons: Epsilons) -> Self {
        self.epsilons = epsilons;
        self
    }

    pub fn with_initial_population_size(mut self, n: usize) -> Self {
        self.initial_population_size = n;
        self
    }

    pub fn with_selection_ratio(mut self, ratio: f64) -> Self {
        self.selection_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_offspring_batch(mut self, n: usize) -> Self {
        self.offspring_batch = n;
        self
    }

    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = Some(n);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Removes the evaluation budget; another termination condition must be
    /// set for the configuration to validate.
    pub fn without_max_evaluations(mut self) -> Self {
        self.max_evaluations = None;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_selector(mut self, selector: SelectorConfig) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_restart(mut self, restart: RestartConfig) -> Self {
        self.restart = restart;
        self
    }

    /// Preset for quick runs.
    ///
    /// - Evaluations: 5,000, Time limit: 10s
    /// - Restart window: 50 generations
    pub fn fast() -> Self {
        Self {
            max_evaluations: Some(5_000),
            time_limit_ms: Some(10_000),
            restart: RestartConfig::default().with_window_size(50),
            ..Self::default()
        }
    }

    /// Preset balancing front quality and run time.
    ///
    /// - Evaluations: 25,000, Time limit: 30s
    pub fn balanced() -> Self {
        Self {
            max_evaluations: Some(25_000),
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for many-objective or deceptive problems.
    ///
    /// - Evaluations: 100,000, Time limit: 60s
    /// - Offspring batch: 8
    pub fn quality() -> Self {
        Self {
            max_evaluations: Some(100_000),
            time_limit_ms: Some(60_000),
            offspring_batch: 8,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// The operator-dependent part of the selector configuration (the floor
    /// against the operator count) is checked when the run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if !(self.selection_ratio > 0.0 && self.selection_ratio <= 1.0) {
            return Err(ConfigError::InvalidSelectionRatio);
        }
        if self.offspring_batch == 0 {
            return Err(ConfigError::InvalidBatch);
        }
        if self.max_evaluations.is_none()
            && self.max_generations.is_none()
            && self.time_limit_ms.is_none()
        {
            return Err(ConfigError::NoTermination);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        self.restart.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BorgConfig::default();
        assert_eq!(config.initial_population_size, 100);
        assert!((config.selection_ratio - 0.02).abs() < 1e-10);
        assert_eq!(config.offspring_batch, 1);
        assert_eq!(config.max_evaluations, Some(10_000));
        assert!(config.max_generations.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!((config.epsilons.get(0) - 0.01).abs() < 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BorgConfig::default()
            .with_initial_population_size(50)
            .with_selection_ratio(0.1)
            .with_offspring_batch(4)
            .with_max_evaluations(2_000)
            .with_max_generations(300)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.initial_population_size, 50);
        assert!((config.selection_ratio - 0.1).abs() < 1e-10);
        assert_eq!(config.offspring_batch, 4);
        assert_eq!(config.max_evaluations, Some(2_000));
        assert_eq!(config.max_generations, Some(300));
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_presets_validate() {
        for config in [BorgConfig::fast(), BorgConfig::balanced(), BorgConfig::quality()] {
            assert!(config.validate().is_ok());
        }
        assert_eq!(BorgConfig::fast().restart.window_size, 50);
        assert_eq!(BorgConfig::quality().offspring_batch, 8);
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(
            BorgConfig::default()
                .with_initial_population_size(0)
                .validate(),
            Err(ConfigError::InvalidPopulationSize)
        );
        assert_eq!(
            BorgConfig::default().with_selection_ratio(0.0).validate(),
            Err(ConfigError::InvalidSelectionRatio)
        );
        assert_eq!(
            BorgConfig::default().with_offspring_batch(0).validate(),
            Err(ConfigError::InvalidBatch)
        );
        assert_eq!(
            BorgConfig::default().without_max_evaluations().validate(),
            Err(ConfigError::NoTermination)
        );
        assert_eq!(
            BorgConfig::default().with_time_limit_ms(0).validate(),
            Err(ConfigError::ZeroTimeLimit)
        );
        assert_eq!(
            BorgConfig::default()
                .with_restart(RestartConfig::default().with_window_size(0))
                .validate(),
            Err(ConfigError::InvalidWindow("window_size"))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = BorgConfig::quality().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: BorgConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(7));
        assert_eq!(back.offspring_batch, 8);
        assert_eq!(back.max_evaluations, Some(100_000));
        assert_eq!(back.selector.policy, config.selector.policy);
        assert!((back.restart.injection_rate - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_selection_ratio_clamped() {
        let config = BorgConfig::default().with_selection_ratio(4.0);
        assert!((config.selection_ratio - 1.0).abs() < 1e-10);
    }
}
