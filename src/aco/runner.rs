//! ACO execution loop.
//!
//! [`AcoColony`] is the step-wise optimizer state machine:
//!
//! ```text
//! Initializing --step--> Iterating --step--> ... --> Done
//! ```
//!
//! - `Initializing`: builds the pheromone field, one random trail per agent
//!   and seeds the best record from that generation.
//! - `Iterating`: every step rebuilds the generation against the current
//!   pheromone field, evaporates and reinforces the field, then offers the
//!   new generation to the best record.
//! - `Done`: iteration budget reached, no-improvement limit hit, or
//!   cancelled.
//!
//! [`AcoRunner`] drives a colony to `Done` in one call.

use super::config::{AcoConfig, RngStreams};
use super::construction::{build_trail_random_start, random_trail};
use super::evaluation::{best_of, BestRecord};
use super::pheromone::update_pheromones;
use super::selection::MoveSelector;
use super::types::{DistanceMatrix, Generation, PheromoneField, Trail};
use crate::error::AcoResult;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use u_numflow::random::create_rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle state of an [`AcoColony`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcoPhase {
    /// Created, no trails built yet.
    Initializing,
    /// Initial generation exists; iterations may run.
    Iterating,
    /// Stopped; the best record is final.
    Done,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// `max_iterations` reached.
    Budget,
    /// `max_no_improve` consecutive iterations without a better trail.
    Stagnation,
    /// Stopped by the caller before any other condition.
    Cancelled,
}

/// Result of an ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoRunResult {
    /// Cheapest trail found over the whole run.
    pub best: Trail,

    /// Cost of `best` under the configured length mode.
    pub best_cost: f64,

    /// Number of iterations executed (initial generation excluded).
    pub iterations: usize,

    /// Iteration in which `best` was found (0 = initial generation).
    pub best_iteration: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Best cost after initialization and after each iteration.
    pub cost_history: Vec<f64>,
}

/// Step-wise Ant Colony Optimizer.
///
/// Owns the pheromone field, the current generation and the random
/// stream; borrows the distance matrix read-only.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoColony, AcoConfig, AcoPhase, DistanceMatrix};
/// use u_numflow::random::create_rng;
///
/// let d = DistanceMatrix::from_fn(6, |i, j| (i.abs_diff(j)) as f64).unwrap();
/// let config = AcoConfig::default().with_max_iterations(5);
/// let mut colony = AcoColony::with_rng(&d, config, create_rng(1)).unwrap();
///
/// assert_eq!(colony.phase(), AcoPhase::Initializing);
/// while colony.step() != AcoPhase::Done {}
/// assert_eq!(colony.iteration(), 5);
/// let result = colony.into_result();
/// assert_eq!(result.best.len(), 6);
/// ```
pub struct AcoColony<'a, R: Rng> {
    distances: &'a DistanceMatrix,
    config: AcoConfig,
    rng: R,
    phase: AcoPhase,
    pheromones: PheromoneField,
    generation: Generation,
    best: Option<BestRecord>,
    generation_best: Option<f64>,
    iteration: usize,
    best_iteration: usize,
    no_improve: usize,
    stop_reason: Option<StopReason>,
    cost_history: Vec<f64>,
}

impl<'a, R: Rng> AcoColony<'a, R> {
    /// Creates a colony driven by `rng`.
    ///
    /// `config.seed` is not consulted; the caller owns seeding.
    ///
    /// # Errors
    /// Returns [`AcoError::Config`](crate::error::AcoError::Config) if the
    /// configuration is invalid.
    pub fn with_rng(distances: &'a DistanceMatrix, config: AcoConfig, rng: R) -> AcoResult<Self> {
        config.validate()?;
        let pheromones = PheromoneField::uniform(
            distances.len(),
            config.initial_pheromone,
            config.min_pheromone,
            config.max_pheromone,
        );
        Ok(Self {
            distances,
            rng,
            phase: AcoPhase::Initializing,
            pheromones,
            generation: Vec::with_capacity(config.num_agents),
            best: None,
            generation_best: None,
            iteration: 0,
            best_iteration: 0,
            no_improve: 0,
            stop_reason: None,
            cost_history: Vec::new(),
            config,
        })
    }

    pub fn phase(&self) -> AcoPhase {
        self.phase
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Best trail so far; `None` until initialized.
    pub fn best(&self) -> Option<&BestRecord> {
        self.best.as_ref()
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    /// Trails of the most recent generation, indexed by agent.
    pub fn generation(&self) -> &[Trail] {
        &self.generation
    }

    /// Cost of the cheapest trail in the most recent generation.
    pub fn generation_best(&self) -> Option<f64> {
        self.generation_best
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Why the colony stopped, once `Done`.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Advances the state machine by one transition and returns the new
    /// phase. A `Done` colony is left untouched.
    pub fn step(&mut self) -> AcoPhase {
        match self.phase {
            AcoPhase::Initializing => self.initialize(),
            AcoPhase::Iterating => self.iterate(),
            AcoPhase::Done => {}
        }
        self.phase
    }

    /// Stops the colony between iterations.
    ///
    /// A colony that was never stepped builds its initial generation
    /// first, so a cancelled colony always has a best trail.
    pub fn cancel(&mut self) {
        if self.phase == AcoPhase::Initializing {
            self.initialize();
        }
        if self.phase != AcoPhase::Done {
            self.finish(StopReason::Cancelled);
        }
    }

    fn initialize(&mut self) {
        let best = self.seed_generation();
        self.best = Some(best);
        self.phase = AcoPhase::Iterating;

        if self.config.max_iterations == 0 {
            self.finish(StopReason::Budget);
        }
    }

    /// Builds the random initial generation and returns its best trail.
    fn seed_generation(&mut self) -> BestRecord {
        let n = self.distances.len();
        self.generation.clear();
        for _ in 0..self.config.num_agents {
            let start = self.rng.random_range(0..n);
            self.generation.push(random_trail(start, n, &mut self.rng));
        }

        let best = BestRecord::from_generation(
            &self.generation,
            self.distances,
            self.config.length_mode,
        );
        info!(
            nodes = n,
            agents = self.config.num_agents,
            initial_best = best.cost,
            "colony initialized"
        );
        self.cost_history.push(best.cost);
        self.generation_best = Some(best.cost);
        best
    }

    fn iterate(&mut self) {
        // construction phase: the field is read-only until every agent is done
        let selector = MoveSelector::new(self.distances, &self.pheromones, &self.config);
        let generation = construct_generation(&selector, &self.config, &mut self.rng);
        self.generation = generation;

        update_pheromones(
            &mut self.pheromones,
            &self.generation,
            self.distances,
            &self.config,
        );

        self.iteration += 1;
        let generation_best = best_of(&self.generation, self.distances, self.config.length_mode);
        self.generation_best = generation_best.map(|(_, cost)| cost);
        let Some(best) = self.best.as_mut() else {
            return;
        };
        let improved = match generation_best {
            Some((idx, cost)) => best.consider(&self.generation[idx], cost),
            None => false,
        };
        let best_cost = best.cost;
        if improved {
            self.best_iteration = self.iteration;
            self.no_improve = 0;
        } else {
            self.no_improve += 1;
        }
        self.cost_history.push(best_cost);
        debug!(
            iteration = self.iteration,
            generation_best = self.generation_best,
            best_cost,
            improved,
            "iteration complete"
        );

        if self.iteration >= self.config.max_iterations {
            self.finish(StopReason::Budget);
        } else if self.config.max_no_improve > 0 && self.no_improve >= self.config.max_no_improve {
            self.finish(StopReason::Stagnation);
        }
    }

    fn finish(&mut self, reason: StopReason) {
        self.phase = AcoPhase::Done;
        self.stop_reason = Some(reason);
        info!(
            iterations = self.iteration,
            best_cost = self.best.as_ref().map(|b| b.cost),
            reason = ?reason,
            "colony finished"
        );
    }

    /// Consumes the colony and reports its best trail.
    ///
    /// A colony that was never stepped is initialized first. A colony
    /// that has not reached `Done` reports [`StopReason::Cancelled`].
    pub fn into_result(mut self) -> AcoRunResult {
        let record = match self.best.take() {
            Some(record) => record,
            None => self.seed_generation(),
        };
        let stop_reason = self.stop_reason.unwrap_or(StopReason::Cancelled);
        AcoRunResult {
            best: record.trail,
            best_cost: record.cost,
            iterations: self.iteration,
            best_iteration: self.best_iteration,
            stop_reason,
            cost_history: self.cost_history,
        }
    }
}

/// Builds one trail per agent against a fixed pheromone snapshot.
fn construct_generation<R: Rng>(
    selector: &MoveSelector<'_>,
    config: &AcoConfig,
    rng: &mut R,
) -> Generation {
    match config.rng_streams {
        RngStreams::Shared => (0..config.num_agents)
            .map(|_| build_trail_random_start(selector, &mut *rng))
            .collect(),
        RngStreams::PerAgent => {
            let seeds: Vec<u64> = (0..config.num_agents).map(|_| rng.random()).collect();

            #[cfg(feature = "parallel")]
            if config.runs_parallel_construction() {
                return seeds
                    .par_iter()
                    .map(|&seed| build_trail_random_start(selector, &mut create_rng(seed)))
                    .collect();
            }

            seeds
                .iter()
                .map(|&seed| build_trail_random_start(selector, &mut create_rng(seed)))
                .collect()
        }
    }
}

/// Runs the Ant Colony Optimizer to completion.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs ACO on `distances`.
    ///
    /// # Errors
    /// Returns [`AcoError::Config`](crate::error::AcoError::Config) if the
    /// configuration is invalid. No other failure is possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_aco::aco::{AcoConfig, AcoRunner, DistanceMatrix};
    ///
    /// let d = DistanceMatrix::new(vec![
    ///     vec![0.0, 2.0, 9.0, 10.0],
    ///     vec![2.0, 0.0, 6.0, 4.0],
    ///     vec![9.0, 6.0, 0.0, 8.0],
    ///     vec![10.0, 4.0, 8.0, 0.0],
    /// ]).unwrap();
    /// let config = AcoConfig::default().with_max_iterations(50).with_seed(42);
    ///
    /// let result = AcoRunner::run(&d, &config).unwrap();
    /// assert_eq!(result.best.len(), 4);
    /// assert_eq!(result.best_cost, 23.0); // optimal closed tour
    /// ```
    pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> AcoResult<AcoRunResult> {
        Self::run_with_cancel(distances, config, None)
    }

    /// Runs ACO with an optional cancellation token.
    ///
    /// The flag is checked before every iteration; once set, the run stops
    /// and returns the best trail found so far.
    pub fn run_with_cancel(
        distances: &DistanceMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AcoResult<AcoRunResult> {
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let mut colony = AcoColony::with_rng(distances, config.clone(), rng)?;

        while colony.step() == AcoPhase::Iterating {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    colony.cancel();
                    break;
                }
            }
        }

        Ok(colony.into_result())
    }
}

/// Runs ACO and returns the best trail with its cost.
///
/// Shorthand for [`AcoRunner::run`].
pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> AcoResult<(Trail, f64)> {
    let result = AcoRunner::run(distances, config)?;
    Ok((result.best, result.best_cost))
}
