//! Stagnation detection and population restarts.

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::RestartConfig;
use crate::adaptive::OperatorSelector;
use crate::archive::EpsilonBoxArchive;
use crate::core::{evaluate_batch, variable_bounds, Population, Problem, Solution};
use crate::error::ConfigError;
use crate::operators::{uniform_mutation, Um};

/// What a restart check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestartKind {
    None,
    /// Population resized around its incumbents.
    Soft,
    /// Population discarded and rebuilt from the archive.
    Hard,
}

/// Published to listeners after every restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartEvent {
    pub kind: RestartKind,
    pub population_size: usize,
}

type Listener = Box<dyn FnMut(&RestartEvent)>;

/// Watches epsilon-progress and population sizing, and restarts the search
/// when either goes wrong.
///
/// Call [`start`](Self::start) once the archive has been seeded, then
/// [`check_and_maybe_restart`](Self::check_and_maybe_restart) exactly
/// once per generation, after offspring have been inserted and the selector
/// updated. Every `window_size` calls it decides:
///
/// 1. **Hard** if the archive made no epsilon-progress since the previous
///    check, or if `max_window_size` generations passed since the last hard
///    restart.
/// 2. **Soft** if `archive.len() / injection_rate` lies within the population
///    bounds and the population size deviates from the target by more than
///    `ratio_tolerance * target`.
/// 3. Nothing otherwise.
pub struct RestartController {
    config: RestartConfig,
    parallel: bool,
    generations_since_check: usize,
    generations_since_hard: usize,
    progress_baseline: usize,
    soft_restarts: usize,
    hard_restarts: usize,
    evaluations: usize,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for RestartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestartController")
            .field("config", &self.config)
            .field("generations_since_check", &self.generations_since_check)
            .field("progress_baseline", &self.progress_baseline)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RestartController {
    pub fn new(config: RestartConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            parallel: false,
            generations_since_check: 0,
            generations_since_hard: 0,
            progress_baseline: 0,
            soft_restarts: 0,
            hard_restarts: 0,
            evaluations: 0,
            listeners: Vec::new(),
        })
    }

    /// Evaluates restart mutants on the rayon pool (`parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &RestartConfig {
        &self.config
    }

    /// Registers a callback invoked synchronously after every restart.
    pub fn add_restart_listener(&mut self, listener: impl FnMut(&RestartEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Opens the first window at the archive's current state.
    ///
    /// Improvements made while seeding the archive are not epsilon-progress.
    pub fn start(&mut self, archive: &EpsilonBoxArchive) {
        self.generations_since_check = 0;
        self.generations_since_hard = 0;
        self.progress_baseline = archive.improvements();
    }

    /// Target population size for the archive's current size.
    pub fn target_population_size(&self, archive_size: usize) -> usize {
        self.config.target_population_size(archive_size)
    }

    /// Archive improvements since the last check or restart.
    pub fn epsilon_progress(&self, archive: &EpsilonBoxArchive) -> usize {
        archive.improvements().saturating_sub(self.progress_baseline)
    }

    pub fn soft_restarts(&self) -> usize {
        self.soft_restarts
    }

    pub fn hard_restarts(&self) -> usize {
        self.hard_restarts
    }

    /// Problem evaluations spent on restart mutants.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Counts one generation and restarts if a check is due and warrants it.
    ///
    /// At most one restart happens per call, and it completes (population
    /// rebuilt, listeners notified) before this returns.
    pub fn check_and_maybe_restart<P, R>(
        &mut self,
        population: &mut Population,
        archive: &mut EpsilonBoxArchive,
        selector: &mut OperatorSelector,
        problem: &P,
        rng: &mut R,
    ) -> RestartKind
    where
        P: Problem + ?Sized,
        R: Rng,
    {
        self.generations_since_check += 1;
        self.generations_since_hard += 1;

        if self.generations_since_check < self.config.window_size {
            return RestartKind::None;
        }
        self.generations_since_check = 0;

        let kind = self.decide(population, archive);
        match kind {
            RestartKind::None => {}
            RestartKind::Hard => {
                self.hard_restart(population, archive, problem, rng);
                selector.reset();
                self.generations_since_hard = 0;
                self.hard_restarts += 1;
            }
            RestartKind::Soft => {
                self.soft_restart(population, archive, problem, rng);
                self.soft_restarts += 1;
            }
        }
        self.progress_baseline = archive.improvements();

        if kind != RestartKind::None {
            let event = RestartEvent {
                kind,
                population_size: population.len(),
            };
            log::debug!(
                "{:?} restart: population {}, archive {}",
                kind,
                event.population_size,
                archive.len()
            );
            for listener in &mut self.listeners {
                listener(&event);
            }
        }
        kind
    }

    fn decide(&self, population: &Population, archive: &EpsilonBoxArchive) -> RestartKind {
        // nothing to reseed from
        if archive.is_empty() {
            return RestartKind::None;
        }
        if self.epsilon_progress(archive) == 0
            || self.generations_since_hard >= self.config.max_window_size
        {
            return RestartKind::Hard;
        }

        // the unclamped target must itself fit the population bounds
        let raw = archive.len() as f64 / self.config.injection_rate;
        if raw < self.config.min_population_size as f64
            || raw > self.config.max_population_size as f64
        {
            return RestartKind::None;
        }

        let target = self.target_population_size(archive.len()) as f64;
        let deviation = (population.len() as f64 - target).abs();
        if deviation > self.config.ratio_tolerance * target {
            RestartKind::Soft
        } else {
            RestartKind::None
        }
    }

    fn hard_restart<P, R>(
        &mut self,
        population: &mut Population,
        archive: &mut EpsilonBoxArchive,
        problem: &P,
        rng: &mut R,
    ) where
        P: Problem + ?Sized,
        R: Rng,
    {
        let target = self.target_population_size(archive.len());

        let mut copies = archive.snapshot();
        copies.shuffle(rng);
        copies.truncate(target);

        population.clear();
        for copy in copies {
            population.push(copy);
        }

        let missing = target - population.len();
        for mutant in self.mutants(missing, archive, problem, rng) {
            population.push(mutant);
        }
    }

    fn soft_restart<P, R>(
        &mut self,
        population: &mut Population,
        archive: &mut EpsilonBoxArchive,
        problem: &P,
        rng: &mut R,
    ) where
        P: Problem + ?Sized,
        R: Rng,
    {
        let target = self.target_population_size(archive.len());

        if population.len() > target {
            population.truncate_by_rank(target);
        } else {
            let missing = target - population.len();
            for mutant in self.mutants(missing, archive, problem, rng) {
                population.push(mutant);
            }
        }
    }

    /// `count` evaluated, uniformly-mutated copies of uniformly sampled
    /// archive members. Every mutant is also offered to the archive.
    fn mutants<P, R>(
        &mut self,
        count: usize,
        archive: &mut EpsilonBoxArchive,
        problem: &P,
        rng: &mut R,
    ) -> Vec<Solution>
    where
        P: Problem + ?Sized,
        R: Rng,
    {
        if count == 0 || archive.is_empty() {
            return Vec::new();
        }

        let bounds = variable_bounds(problem);
        let um = Um {
            rate: self
                .config
                .mutation_rate
                .unwrap_or_else(|| Um::for_variables(bounds.len()).rate),
        };

        let mut batch: Vec<Solution> = (0..count)
            .filter_map(|_| archive.get(rng.random_range(0..archive.len())))
            .map(Solution::offspring)
            .collect();
        for child in &mut batch {
            uniform_mutation(child.variables_mut(), &um, &bounds, rng);
        }

        evaluate_batch(problem, &mut batch, self.parallel);
        self.evaluations += batch.len();
        for mutant in &batch {
            archive.add(mutant.clone());
        }
        batch
    }
}

// ============================================================================
// Tests
// ============================================================================
