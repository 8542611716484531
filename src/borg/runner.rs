//! Borg main loop.
//!
//! [`BorgRunner`] wires the archive, the adaptive operator selector and the
//! restart controller together:
//! select operator → select parents → vary → evaluate → insert into
//! archive and population → update selector → restart check → repeat.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::config::BorgConfig;
use crate::adaptive::OperatorSelector;
use crate::archive::EpsilonBoxArchive;
use crate::core::{
    evaluate_batch, random_solution, validate_problem, variable_bounds, Population, Problem,
    Solution,
};
use crate::error::ConfigError;
use crate::operators::{borg_operators, tournament_size, Operator};
use crate::random::rng_from_option;
use crate::restart::{RestartController, RestartKind};

/// Result of a Borg run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorgResult {
    /// Final archive members: the approximation set.
    pub archive: Vec<Solution>,

    /// Number of generations executed.
    pub generations: usize,

    /// Problem evaluations, including restart mutants.
    pub evaluations: usize,

    pub soft_restarts: usize,

    pub hard_restarts: usize,

    /// Operator selection probabilities at the end of the run.
    pub operator_probabilities: Vec<f64>,

    /// Archive size at the end of each generation.
    pub archive_size_history: Vec<usize>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped on its time limit.
    pub timed_out: bool,
}

/// Executes the Borg MOEA.
///
/// # Usage
///
/// ```
/// use u_moea::borg::{BorgConfig, BorgRunner};
/// use u_moea::core::{Evaluation, Problem};
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn bounds(&self, _index: usize) -> (f64, f64) { (-10.0, 10.0) }
///     fn evaluate(&self, x: &[f64]) -> Evaluation {
///         Evaluation::unconstrained(vec![x[0] * x[0], (x[0] - 2.0).powi(2)])
///     }
/// }
///
/// let config = BorgConfig::default()
///     .with_max_evaluations(2_000)
///     .with_seed(42)
///     .with_parallel(false);
/// let result = BorgRunner::run(&Schaffer, &config).unwrap();
/// assert!(!result.archive.is_empty());
/// ```
pub struct BorgRunner;

impl BorgRunner {
    /// Runs Borg with the default operator set.
    pub fn run<P: Problem>(problem: &P, config: &BorgConfig) -> Result<BorgResult, ConfigError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs Borg with the default operator set and an optional cancellation
    /// token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops at
    /// the next generation boundary. Offspring already being evaluated are
    /// finished and inserted first.
    pub fn run_with_cancel<P: Problem>(
        problem: &P,
        config: &BorgConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BorgResult, ConfigError> {
        let operators = borg_operators(problem.number_of_variables());
        Self::run_with_operators(problem, operators, config, cancel)
    }

    /// Runs Borg over a custom operator list.
    pub fn run_with_operators<P: Problem>(
        problem: &P,
        operators: Vec<Operator>,
        config: &BorgConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BorgResult, ConfigError> {
        config.validate()?;
        validate_problem(problem)?;
        config
            .epsilons
            .check_dimension(problem.number_of_objectives())?;

        let mut selector = OperatorSelector::new(operators, config.selector.clone())?;
        let mut restart =
            RestartController::new(config.restart.clone())?.with_parallel(config.parallel);

        let tournament = Rc::new(Cell::new(tournament_size(
            config.initial_population_size,
            config.selection_ratio,
        )));
        {
            let tournament = Rc::clone(&tournament);
            let ratio = config.selection_ratio;
            restart.add_restart_listener(move |event| {
                tournament.set(tournament_size(event.population_size, ratio));
            });
        }

        let mut rng = rng_from_option(config.seed);
        let bounds = variable_bounds(problem);
        let start = Instant::now();

        log::info!(
            "borg: {} variables, {} objectives, {} operators",
            bounds.len(),
            problem.number_of_objectives(),
            selector.len()
        );

        // 1. Initial population
        let mut initial: Vec<Solution> = (0..config.initial_population_size)
            .map(|_| random_solution(&bounds, &mut rng))
            .collect();
        evaluate_batch(problem, &mut initial, config.parallel);
        let mut evaluations = initial.len();

        let mut archive =
            EpsilonBoxArchive::with_solutions(config.epsilons.clone(), initial.iter().cloned());
        let mut population = Population::from_solutions(initial);
        restart.start(&archive);

        let mut generations = 0usize;
        let mut archive_size_history = Vec::new();
        let mut cancelled = false;
        let mut timed_out = false;

        // 2. Steady-state loop
        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() as u64 >= limit {
                    timed_out = true;
                    break;
                }
            }
            let spent = evaluations + restart.evaluations();
            if config.max_evaluations.is_some_and(|max| spent >= max)
                || config.max_generations.is_some_and(|max| generations >= max)
            {
                break;
            }

            // Offspring
            let mut offspring = Vec::new();
            for _ in 0..config.offspring_batch {
                let index = selector.select_operator(&mut rng);
                let operator = *selector.operator(index);
                let children = operator.apply(
                    population.as_slice(),
                    &archive,
                    tournament.get(),
                    &bounds,
                    &mut rng,
                );
                for mut child in children {
                    child.set_operator_index(index);
                    offspring.push(child);
                }
            }
            if let Some(max) = config.max_evaluations {
                offspring.truncate(max - spent);
            }

            evaluate_batch(problem, &mut offspring, config.parallel);
            evaluations += offspring.len();

            // Insertion and credit
            for child in offspring {
                if archive.add(child.clone()) {
                    if let Some(index) = child.operator_index() {
                        selector.record_acceptance(index);
                    }
                }
                population.add(child, &mut rng);
            }
            selector.update(&archive);
            generations += 1;

            let kind = restart.check_and_maybe_restart(
                &mut population,
                &mut archive,
                &mut selector,
                problem,
                &mut rng,
            );
            if kind != RestartKind::None {
                log::debug!(
                    "generation {}: tournament size now {}",
                    generations,
                    tournament.get()
                );
            }
            archive_size_history.push(archive.len());
        }

        let evaluations = evaluations + restart.evaluations();
        log::info!(
            "borg finished: {} generations, {} evaluations, archive {}, restarts {} soft / {} hard",
            generations,
            evaluations,
            archive.len(),
            restart.soft_restarts(),
            restart.hard_restarts()
        );

        Ok(BorgResult {
            archive: archive.snapshot(),
            generations,
            evaluations,
            soft_restarts: restart.soft_restarts(),
            hard_restarts: restart.hard_restarts(),
            operator_probabilities: selector.probabilities(),
            archive_size_history,
            cancelled,
            timed_out,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
