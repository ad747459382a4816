//! Probabilistic move selection.
//!
//! From node `x`, every unvisited node `i` receives the desirability
//!
//! ```text
//! d[i] = tau(x, i)^alpha * (1 / dist(x, i))^beta
//! ```
//!
//! clamped into `[min_desirability, f64::MAX / (100 n)]` so that it neither
//! underflows to zero nor overflows when summed. The next node is drawn
//! with probability `d[i] / sum(d)` (roulette wheel).
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"

use super::config::AcoConfig;
use super::types::{DistanceMatrix, PheromoneField};
use rand::Rng;
use tracing::trace;

/// Draws the next node of an in-progress trail.
///
/// Holds read-only views of the distance matrix and pheromone field, so a
/// single selector can be shared by every agent of a generation.
#[derive(Debug, Clone, Copy)]
pub struct MoveSelector<'a> {
    distances: &'a DistanceMatrix,
    pheromones: &'a PheromoneField,
    alpha: f64,
    beta: f64,
    min_desirability: f64,
    max_desirability: f64,
}

impl<'a> MoveSelector<'a> {
    /// Creates a selector over the current pheromone state.
    ///
    /// # Panics
    /// Panics if `distances` and `pheromones` cover different node counts.
    pub fn new(
        distances: &'a DistanceMatrix,
        pheromones: &'a PheromoneField,
        config: &AcoConfig,
    ) -> Self {
        assert_eq!(
            distances.len(),
            pheromones.len(),
            "distance matrix and pheromone field sizes differ"
        );
        let max_desirability = f64::MAX / (distances.len() as f64 * 100.0);
        Self {
            distances,
            pheromones,
            alpha: config.alpha,
            beta: config.beta,
            min_desirability: config.min_desirability,
            max_desirability,
        }
    }

    /// Number of nodes in the underlying graph.
    pub fn num_nodes(&self) -> usize {
        self.distances.len()
    }

    /// Clamped desirability of moving from `current` to `candidate`, or 0
    /// for the current node and visited nodes.
    pub fn desirability(&self, current: usize, candidate: usize, visited: &[bool]) -> f64 {
        if candidate == current || visited[candidate] {
            return 0.0;
        }
        let tau = self.pheromones.get(current, candidate);
        let eta = 1.0 / self.distances.get(current, candidate);
        let d = tau.powf(self.alpha) * eta.powf(self.beta);
        if d.is_nan() {
            return self.min_desirability;
        }
        d.max(self.min_desirability).min(self.max_desirability)
    }

    /// Probability of moving from `current` to each node.
    ///
    /// Sums to 1 over unvisited nodes; exactly 0 for `current` and every
    /// visited node. All zeros when nothing is left to visit.
    pub fn move_probabilities(&self, current: usize, visited: &[bool]) -> Vec<f64> {
        let mut probs = Vec::with_capacity(self.num_nodes());
        self.fill_probabilities(current, visited, &mut probs);
        probs
    }

    fn fill_probabilities(&self, current: usize, visited: &[bool], probs: &mut Vec<f64>) {
        probs.clear();
        probs.extend((0..self.num_nodes()).map(|i| self.desirability(current, i, visited)));
        let sum: f64 = probs.iter().sum();
        if sum > 0.0 {
            for p in probs.iter_mut() {
                *p /= sum;
            }
        }
    }

    /// Draws the next node from `current`.
    ///
    /// Picks the smallest index whose cumulative upper bound exceeds a
    /// uniform `u` in `[0, 1)`. If rounding leaves `u` past the final
    /// bound, the last unvisited candidate is returned.
    ///
    /// # Panics
    /// Panics if every node other than `current` is already visited.
    pub fn select<R: Rng>(&self, current: usize, visited: &[bool], rng: &mut R) -> usize {
        let mut probs = Vec::with_capacity(self.num_nodes());
        self.select_with_buffer(current, visited, &mut probs, rng)
    }

    /// Same as [`select`](Self::select), reusing `probs` as scratch space.
    pub(crate) fn select_with_buffer<R: Rng>(
        &self,
        current: usize,
        visited: &[bool],
        probs: &mut Vec<f64>,
        rng: &mut R,
    ) -> usize {
        self.fill_probabilities(current, visited, probs);
        let u: f64 = rng.random();
        pick_from_cumulative(probs, u)
    }
}

/// Roulette-wheel pick over `probs` for a draw `u` in `[0, 1)`.
///
/// Zero-probability entries are never returned. Falls back to the last
/// positive entry when `u` lands beyond the accumulated total.
pub(crate) fn pick_from_cumulative(probs: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_candidate = None;
    for (i, &p) in probs.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_candidate = Some(i);
        if u < cumulative {
            return i;
        }
    }

    let fallback = last_candidate.expect("move selection requires at least one unvisited node");
    trace!(u, cumulative, fallback, "roulette draw past cumulative total, using last candidate");
    fallback
}
