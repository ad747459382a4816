//! Pheromone evaporation and deposit.
//!
//! For every pair `(i, j)`:
//!
//! ```text
//! tau(i, j) <- clamp((1 - rho) * tau(i, j) + sum_k [edge in trail k] * Q / cost_k)
//! ```
//!
//! Edges are cyclic: the last and first nodes of a trail are adjacent.
//! Both `(i, j)` and `(j, i)` receive the same value.

use super::config::AcoConfig;
use super::evaluation::evaluate_trail;
use super::types::{DistanceMatrix, PheromoneField, Trail};

/// Evaporates `pheromones` and reinforces the edges of every trail in
/// `generation`, in one pass.
///
/// Each trail deposits `q / cost` on each of its cyclic edges, where
/// `cost` follows `config.length_mode`. Every cell ends inside the field's
/// clamp bounds and the matrix stays symmetric.
///
/// # Panics
/// Panics if the field, the matrix and the trails do not all cover the
/// same number of nodes.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{update_pheromones, AcoConfig, DistanceMatrix, PheromoneField, Trail};
///
/// let d = DistanceMatrix::from_fn(3, |_, _| 1.0).unwrap();
/// let config = AcoConfig::default().with_rho(0.5).with_q(0.0);
/// let mut tau = PheromoneField::uniform(3, 1.0, 1e-4, 1e5);
///
/// let generation = vec![Trail::new(vec![0, 1, 2], 3).unwrap()];
/// update_pheromones(&mut tau, &generation, &d, &config);
/// assert_eq!(tau.get(0, 1), 0.5);
/// ```
pub fn update_pheromones(
    pheromones: &mut PheromoneField,
    generation: &[Trail],
    distances: &DistanceMatrix,
    config: &AcoConfig,
) {
    let n = distances.len();
    assert_eq!(
        pheromones.len(),
        n,
        "pheromone field covers {} nodes, distance matrix {n}",
        pheromones.len()
    );
    for trail in generation {
        assert_eq!(trail.len(), n, "trail of {} nodes on a {n}-node graph", trail.len());
    }

    let deposits = edge_deposits(generation, distances, config);
    pheromones.evaporate_and_deposit(1.0 - config.rho, &deposits, config.runs_parallel_update());
}

/// Row-major `n x n` matrix of the reinforcement each pair receives.
///
/// Both `(a, b)` and `(b, a)` are incremented by the same amounts in the
/// same order, so the result is exactly symmetric.
fn edge_deposits(generation: &[Trail], distances: &DistanceMatrix, config: &AcoConfig) -> Vec<f64> {
    let n = distances.len();
    let mut deposits = vec![0.0; n * n];
    if config.q == 0.0 {
        return deposits;
    }

    for trail in generation {
        let cost = evaluate_trail(trail, distances, config.length_mode);
        let amount = config.q / cost;
        for (a, b) in trail.cyclic_edges() {
            deposits[a * n + b] += amount;
            deposits[b * n + a] += amount;
        }
    }
    deposits
}
