//! Trail cost and elitist best tracking.

use super::config::LengthMode;
use super::types::{DistanceMatrix, Trail};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Total cost of `trail` under `mode`.
///
/// - [`LengthMode::OpenPath`]: `n - 1` consecutive edges.
/// - [`LengthMode::ClosedTour`]: the open path plus the edge from the
///   last node back to the first.
///
/// ```
/// use u_aco::aco::{evaluate_trail, DistanceMatrix, LengthMode, Trail};
///
/// let d = DistanceMatrix::new(vec![
///     vec![0.0, 2.0, 9.0],
///     vec![2.0, 0.0, 6.0],
///     vec![9.0, 6.0, 0.0],
/// ]).unwrap();
/// let t = Trail::new(vec![0, 1, 2], 3).unwrap();
/// assert_eq!(evaluate_trail(&t, &d, LengthMode::OpenPath), 8.0);
/// assert_eq!(evaluate_trail(&t, &d, LengthMode::ClosedTour), 17.0);
/// ```
pub fn evaluate_trail(trail: &Trail, distances: &DistanceMatrix, mode: LengthMode) -> f64 {
    let nodes = trail.nodes();
    let open: f64 = nodes.windows(2).map(|w| distances.get(w[0], w[1])).sum();
    match (mode, nodes.first(), nodes.last()) {
        (LengthMode::ClosedTour, Some(&first), Some(&last)) if nodes.len() > 1 => {
            open + distances.get(last, first)
        }
        _ => open,
    }
}

/// Index and cost of the cheapest trail in `generation`.
///
/// Strict less-than comparison: ties keep the earliest agent.
/// Returns `None` for an empty generation.
pub fn best_of(
    generation: &[Trail],
    distances: &DistanceMatrix,
    mode: LengthMode,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (k, trail) in generation.iter().enumerate() {
        let cost = evaluate_trail(trail, distances, mode);
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((k, cost)),
        }
    }
    best
}

/// The cheapest trail seen so far in a run, with its cost.
///
/// Only replaced by a strictly cheaper trail, so the cost never increases.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BestRecord {
    /// Champion trail.
    pub trail: Trail,
    /// Cost of the champion trail.
    pub cost: f64,
}

impl BestRecord {
    /// Seeds the record from a non-empty generation.
    ///
    /// # Panics
    /// Panics if `generation` is empty.
    pub fn from_generation(
        generation: &[Trail],
        distances: &DistanceMatrix,
        mode: LengthMode,
    ) -> Self {
        let (idx, cost) =
            best_of(generation, distances, mode).expect("generation must not be empty");
        Self {
            trail: generation[idx].clone(),
            cost,
        }
    }

    /// Replaces the record with the generation's best if strictly cheaper.
    ///
    /// Returns `true` when the record changed.
    pub fn offer(
        &mut self,
        generation: &[Trail],
        distances: &DistanceMatrix,
        mode: LengthMode,
    ) -> bool {
        match best_of(generation, distances, mode) {
            Some((idx, cost)) => self.consider(&generation[idx], cost),
            None => false,
        }
    }

    /// Replaces the record with `trail` if `cost` is strictly lower.
    ///
    /// `cost` must already be the trail's cost under the run's length mode.
    pub fn consider(&mut self, trail: &Trail, cost: f64) -> bool {
        if cost < self.cost {
            self.trail = trail.clone();
            self.cost = cost;
            true
        } else {
            false
        }
    }
}
