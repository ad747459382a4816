//! Ant Colony Optimization engine for symmetric routing problems.
//!
//! Approximates a low-cost visiting order over a set of nodes with
//! pairwise travel costs:
//!
//! - **Trail construction**: probabilistic move selection from a
//!   pheromone/heuristic desirability blend.
//! - **Reinforcement**: evaporation and quality-proportional deposit with
//!   clamping for numeric stability.
//! - **Elitism**: the best trail across all iterations is retained.
//!
//! The primitives ([`aco::build_trail`], [`aco::evaluate_trail`],
//! [`aco::update_pheromones`]) are public so they can be reused outside
//! the bundled [`aco::AcoRunner`] loop.
//!
//! # Architecture
//!
//! Like the other U-Engine algorithm crates this one depends only on
//! `u-numflow` for random number generation. It knows nothing about
//! where distances come from or how results are displayed; graph
//! generation and rendering belong to callers.
//!
//! # Example
//!
//! ```
//! use u_aco::aco::{AcoConfig, AcoRunner, DistanceMatrix};
//!
//! let d = DistanceMatrix::from_fn(8, |i, j| ((i * 3 + j * 5) % 7 + 1) as f64)?;
//! let config = AcoConfig::default()
//!     .with_num_agents(8)
//!     .with_max_iterations(100)
//!     .with_seed(42);
//!
//! let result = AcoRunner::run(&d, &config)?;
//! assert_eq!(result.best.len(), 8);
//! # Ok::<(), u_aco::AcoError>(())
//! ```

pub mod aco;
pub mod error;

pub use error::{AcoError, AcoResult};
