//! Configuration errors.
//!
//! Every configurable component validates eagerly and fails construction with
//! a [`ConfigError`]. There is no degraded mode: a run never starts with an
//! invalid epsilon vector, operator list, or window size.

/// Errors raised while validating a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("epsilon vector must not be empty")]
    EmptyEpsilons,
    #[error("epsilon[{index}] must be finite and positive, got {value}")]
    InvalidEpsilon { index: usize, value: f64 },
    #[error("epsilon vector has {actual} entries but the problem has {expected} objectives")]
    EpsilonDimension { expected: usize, actual: usize },
    #[error("initial population size must be at least 1")]
    InvalidPopulationSize,
    #[error("population bounds are invalid: min {min}, max {max}")]
    PopulationBounds { min: usize, max: usize },
    #[error("injection rate must be in (0, 1]")]
    InvalidInjectionRate,
    #[error("{0} must be at least 1 generation")]
    InvalidWindow(&'static str),
    #[error("selection ratio must be in (0, 1]")]
    InvalidSelectionRatio,
    #[error("at least one operator is required")]
    NoOperators,
    #[error("probability floor {floor} cannot be honoured by {operators} operators")]
    InvalidFloor { floor: f64, operators: usize },
    #[error("smoothing constant must be in (0, 1]")]
    InvalidSmoothing,
    #[error("ratio tolerance must be non-negative and finite")]
    InvalidRatioTolerance,
    #[error("offspring batch must be at least 1")]
    InvalidBatch,
    #[error("no termination condition configured")]
    NoTermination,
    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
    #[error("invalid operator: {0}")]
    InvalidOperator(String),
    #[error("invalid problem: {0}")]
    InvalidProblem(String),
}
