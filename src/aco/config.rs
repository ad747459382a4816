//! ACO configuration.
//!
//! [`AcoConfig`] holds every parameter that steers trail construction,
//! pheromone reinforcement and termination.

use crate::error::{AcoError, AcoResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the cost of a trail is measured.
///
/// The same mode is used everywhere a cost is computed: deposit amounts,
/// best-trail tracking and the reported result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthMode {
    /// Sum of the `N - 1` edges between consecutive trail positions.
    OpenPath,

    /// Open path plus the return edge from the last node to the first.
    #[default]
    ClosedTour,
}

/// How random draws are distributed among agents.
///
/// # Tradeoff
///
/// - `Shared`: every draw comes from the colony stream in agent order.
///   Construction is strictly sequential.
/// - `PerAgent`: the colony stream hands each agent a fresh seed every
///   iteration. Agents are independent and may be built in parallel; the
///   run is reproducible but its trails differ from a `Shared` run with
///   the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RngStreams {
    /// One stream, consumed sequentially.
    #[default]
    Shared,

    /// One independently seeded sub-stream per agent per iteration.
    PerAgent,
}

/// Configuration for the Ant Colony Optimizer.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoConfig, LengthMode};
///
/// let config = AcoConfig::default()
///     .with_num_agents(10)
///     .with_max_iterations(200)
///     .with_alpha(1.0)
///     .with_beta(2.0)
///     .with_rho(0.1)
///     .with_length_mode(LengthMode::OpenPath)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoConfig {
    /// Number of agents (ants) per generation.
    pub num_agents: usize,

    /// Iteration budget. 0 returns the best of the initial generation.
    pub max_iterations: usize,

    /// Pheromone influence exponent.
    pub alpha: f64,

    /// Heuristic (inverse distance) influence exponent.
    pub beta: f64,

    /// Evaporation rate in `[0, 1)`.
    pub rho: f64,

    /// Deposit scale: each trail adds `q / cost` to its edges.
    pub q: f64,

    /// Uniform value the pheromone field starts from.
    pub initial_pheromone: f64,

    /// Lower clamp bound for every pheromone cell.
    pub min_pheromone: f64,

    /// Upper clamp bound for every pheromone cell.
    pub max_pheromone: f64,

    /// Floor applied to nonzero move desirabilities so that they never
    /// underflow to zero.
    pub min_desirability: f64,

    /// Trail cost measurement.
    pub length_mode: LengthMode,

    /// Random stream layout.
    pub rng_streams: RngStreams,

    /// Update pheromone rows (and build trails) on the rayon pool.
    ///
    /// Only honoured with the `parallel` feature. Trail construction also
    /// needs [`RngStreams::PerAgent`]; a shared stream is drawn in order.
    pub parallel: bool,

    /// Stop after this many consecutive iterations without a strictly
    /// better trail. 0 disables the check.
    pub max_no_improve: usize,

    /// Random seed for reproducibility. `None` draws a random seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_agents: 4,
            max_iterations: 1000,
            alpha: 1.0,
            beta: 1.0,
            rho: 0.01,
            q: 2.0,
            initial_pheromone: 0.01,
            min_pheromone: 1e-4,
            max_pheromone: 1e5,
            min_desirability: 1e-4,
            length_mode: LengthMode::default(),
            rng_streams: RngStreams::default(),
            parallel: false,
            max_no_improve: 0,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Sets the number of agents per generation.
    pub fn with_num_agents(mut self, n: usize) -> Self {
        self.num_agents = n;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the deposit scale constant.
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = value;
        self
    }

    /// Sets both pheromone clamp bounds.
    pub fn with_pheromone_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_pheromone = min;
        self.max_pheromone = max;
        self
    }

    pub fn with_min_desirability(mut self, value: f64) -> Self {
        self.min_desirability = value;
        self
    }

    pub fn with_length_mode(mut self, mode: LengthMode) -> Self {
        self.length_mode = mode;
        self
    }

    pub fn with_rng_streams(mut self, streams: RngStreams) -> Self {
        self.rng_streams = streams;
        self
    }

    /// Enables or disables parallel construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the no-improvement limit (0 to disable).
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the pheromone update runs on the rayon pool.
    pub(crate) fn runs_parallel_update(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }

    /// Whether trail construction runs on the rayon pool.
    pub(crate) fn runs_parallel_construction(&self) -> bool {
        self.runs_parallel_update() && self.rng_streams == RngStreams::PerAgent
    }

    /// Validates the configuration.
    ///
    /// Returns [`AcoError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_agents < 1 {
            return Err(config_err("num_agents must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.rho) {
            return Err(config_err(format!("rho must be in [0, 1), got {}", self.rho)));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(config_err(format!(
                "alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(config_err(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !self.q.is_finite() || self.q < 0.0 {
            return Err(config_err(format!(
                "q must be finite and non-negative, got {}",
                self.q
            )));
        }
        if !self.min_pheromone.is_finite() || self.min_pheromone <= 0.0 {
            return Err(config_err("min_pheromone must be positive and finite"));
        }
        if !self.max_pheromone.is_finite() || self.max_pheromone < self.min_pheromone {
            return Err(config_err(
                "max_pheromone must be finite and not below min_pheromone",
            ));
        }
        if !(self.min_pheromone..=self.max_pheromone).contains(&self.initial_pheromone) {
            return Err(config_err(format!(
                "initial_pheromone {} outside [{}, {}]",
                self.initial_pheromone, self.min_pheromone, self.max_pheromone
            )));
        }
        if !self.min_desirability.is_finite() || self.min_desirability <= 0.0 {
            return Err(config_err("min_desirability must be positive and finite"));
        }
        Ok(())
    }
}

fn config_err(msg: impl Into<String>) -> AcoError {
    AcoError::Config(msg.into())
}
