//! Ant Colony Optimization (ACO).
//!
//! A population of agents (ants) builds complete visiting orders over a
//! symmetric graph. Each move is drawn with probability proportional to
//! a blend of learned pheromone and inverse distance. After every
//! generation the pheromone field evaporates and each trail reinforces its
//! own edges in proportion to its quality. The cheapest trail ever seen is
//! kept as the elitist best.
//!
//! # Building blocks
//!
//! - [`DistanceMatrix`]: immutable symmetric travel costs
//! - [`PheromoneField`]: clamped symmetric reinforcement values
//! - [`MoveSelector`]: next-node distribution and roulette draw
//! - [`build_trail`]: one agent's complete trail
//! - [`evaluate_trail`]: trail cost under a [`LengthMode`]
//! - [`update_pheromones`]: evaporation plus deposit
//! - [`BestRecord`]: elitist best across iterations
//!
//! # Drivers
//!
//! - [`AcoColony`]: step-wise state machine
//! - [`AcoRunner`]: run to completion, optionally cancellable
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod config;
mod construction;
mod evaluation;
mod pheromone;
mod runner;
mod selection;
mod types;

#[cfg(test)]
mod proptests;

pub use config::{AcoConfig, LengthMode, RngStreams};
pub use construction::{build_trail, build_trail_random_start, random_trail};
pub use evaluation::{best_of, evaluate_trail, BestRecord};
pub use pheromone::update_pheromones;
pub use runner::{run, AcoColony, AcoPhase, AcoRunResult, AcoRunner, StopReason};
pub use selection::MoveSelector;
pub use types::{is_permutation, DistanceMatrix, Generation, PheromoneField, Trail};
