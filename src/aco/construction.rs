//! Trail construction.
//!
//! [`build_trail`] walks one agent through the graph using a
//! [`MoveSelector`]; [`random_trail`] produces the unguided trails of the
//! initial generation.

use super::selection::MoveSelector;
use super::types::Trail;
use rand::Rng;

/// Builds a complete trail for one agent, starting at `start`.
///
/// Marks `start` visited, then asks the selector for `n - 1` further
/// nodes. The result is always a permutation of `0..n`.
///
/// # Panics
/// Panics if `start >= n`.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{build_trail, AcoConfig, DistanceMatrix, MoveSelector, PheromoneField};
/// use u_numflow::random::create_rng;
///
/// let d = DistanceMatrix::from_fn(5, |i, j| (i + j) as f64 + 1.0).unwrap();
/// let config = AcoConfig::default();
/// let tau = PheromoneField::uniform(5, 0.01, 1e-4, 1e5);
/// let selector = MoveSelector::new(&d, &tau, &config);
///
/// let trail = build_trail(&selector, 3, &mut create_rng(1));
/// assert_eq!(trail.nodes()[0], 3);
/// assert_eq!(trail.len(), 5);
/// ```
pub fn build_trail<R: Rng>(selector: &MoveSelector<'_>, start: usize, rng: &mut R) -> Trail {
    let n = selector.num_nodes();
    assert!(start < n, "start node {start} out of range for {n} nodes");

    let mut nodes = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    let mut probs = Vec::with_capacity(n);

    nodes.push(start);
    visited[start] = true;
    let mut current = start;

    for _ in 1..n {
        let next = selector.select_with_buffer(current, &visited, &mut probs, rng);
        debug_assert!(!visited[next]);
        nodes.push(next);
        visited[next] = true;
        current = next;
    }

    Trail::from_permutation(nodes)
}

/// Builds a trail for one agent from a uniformly random start node.
pub fn build_trail_random_start<R: Rng>(selector: &MoveSelector<'_>, rng: &mut R) -> Trail {
    let start = rng.random_range(0..selector.num_nodes());
    build_trail(selector, start, rng)
}

/// Uniformly random permutation of `0..n` with `start` moved to the front.
///
/// Position `i` is swapped with a uniform draw from `i..n`, front to
/// back, so exactly `n` range draws are consumed.
pub fn random_trail<R: Rng>(start: usize, n: usize, rng: &mut R) -> Trail {
    assert!(start < n, "start node {start} out of range for {n} nodes");
    let mut perm: Vec<usize> = (0..n).collect();
    for i in 0..n {
        let r = rng.random_range(i..n);
        perm.swap(i, r);
    }

    if let Some(idx) = perm.iter().position(|&v| v == start) {
        perm.swap(0, idx);
    }
    Trail::from_permutation(perm)
}
