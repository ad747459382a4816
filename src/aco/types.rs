//! Core data structures: distance matrix, pheromone field, trail.
//!
//! Both matrices are stored row-major in a flat `Vec<f64>` and keep their
//! invariants (symmetry, zero diagonal, clamp bounds) behind their own
//! constructors and mutation methods.

use crate::error::{AcoError, AcoResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// DistanceMatrix
// ============================================================================

/// Immutable symmetric travel-cost matrix over node indices `0..n`.
///
/// Invariants, checked at construction:
/// - `n >= 2`
/// - `dist[i][i] == 0`
/// - `dist[i][j] == dist[j][i] > 0` and finite for `i != j`
///
/// # Examples
///
/// ```
/// use u_aco::aco::DistanceMatrix;
///
/// let d = DistanceMatrix::new(vec![
///     vec![0.0, 2.0, 9.0],
///     vec![2.0, 0.0, 6.0],
///     vec![9.0, 6.0, 0.0],
/// ]).unwrap();
/// assert_eq!(d.len(), 3);
/// assert_eq!(d.get(2, 1), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix from rows, validating every invariant.
    pub fn new(rows: Vec<Vec<f64>>) -> AcoResult<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(AcoError::TooFewNodes(n));
        }
        let mut values = Vec::with_capacity(n * n);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != n {
                return Err(AcoError::NotSquare {
                    row,
                    len: r.len(),
                    expected: n,
                });
            }
            values.extend(r);
        }

        let matrix = Self { n, values };
        matrix.check()?;
        Ok(matrix)
    }

    /// Builds a matrix by evaluating `f(i, j)` for every `i < j` and
    /// mirroring the result into the lower triangle.
    ///
    /// ```
    /// use u_aco::aco::DistanceMatrix;
    ///
    /// let d = DistanceMatrix::from_fn(4, |i, j| (j - i) as f64).unwrap();
    /// assert_eq!(d.get(3, 0), 3.0);
    /// ```
    pub fn from_fn<F>(n: usize, mut f: F) -> AcoResult<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if n < 2 {
            return Err(AcoError::TooFewNodes(n));
        }
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = f(i, j);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }

        let matrix = Self { n, values };
        matrix.check()?;
        Ok(matrix)
    }

    fn check(&self) -> AcoResult<()> {
        let n = self.n;
        for i in 0..n {
            if self.get(i, i) != 0.0 {
                return Err(AcoError::NonZeroDiagonal(i));
            }
            for j in (i + 1)..n {
                let forward = self.get(i, j);
                let backward = self.get(j, i);
                for (a, b, value) in [(i, j, forward), (j, i, backward)] {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(AcoError::NonPositiveDistance { i: a, j: b, value });
                    }
                }
                if forward != backward {
                    return Err(AcoError::Asymmetric {
                        i,
                        j,
                        forward,
                        backward,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`: a valid matrix has at least two nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Distances from `i` to every node.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}

// ============================================================================
// PheromoneField
// ============================================================================

/// Mutable symmetric matrix of pheromone values.
///
/// Every cell stays inside `[min, max]`. The field is only changed through
/// [`update_pheromones`](crate::aco::update_pheromones), which rewrites all
/// cells in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    n: usize,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl PheromoneField {
    /// Creates an `n x n` field filled with `initial`, clamped to `[min, max]`.
    ///
    /// # Panics
    /// Panics if `min > max` (a validated [`AcoConfig`](crate::aco::AcoConfig)
    /// never produces this).
    pub fn uniform(n: usize, initial: f64, min: f64, max: f64) -> Self {
        assert!(min <= max, "pheromone bounds inverted: {min} > {max}");
        Self {
            n,
            values: vec![initial.clamp(min, max); n * n],
            min,
            max,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Pheromone on edge `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Pheromone from `i` to every node.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Clamp bounds `(min, max)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Sets every cell to `clamp(retain * value + deposits[cell])`.
    ///
    /// `deposits` must be symmetric and `n * n` long; each cell depends on
    /// its own old value only, so the result stays symmetric bit-for-bit.
    ///
    /// # Panics
    /// Panics if `deposits.len() != n * n`.
    pub(crate) fn evaporate_and_deposit(&mut self, retain: f64, deposits: &[f64], parallel: bool) {
        assert_eq!(
            deposits.len(),
            self.values.len(),
            "deposit matrix does not match a {0}x{0} pheromone field",
            self.n
        );
        let (min, max) = (self.min, self.max);
        let n = self.n;

        let update_row = |(row, dep): (&mut [f64], &[f64])| {
            for (cell, &d) in row.iter_mut().zip(dep) {
                *cell = (retain * *cell + d).clamp(min, max);
            }
        };

        #[cfg(feature = "parallel")]
        if parallel {
            self.values
                .par_chunks_mut(n)
                .zip(deposits.par_chunks(n))
                .for_each(update_row);
            return;
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        self.values
            .chunks_mut(n)
            .zip(deposits.chunks(n))
            .for_each(update_row);
    }
}

// ============================================================================
// Trail
// ============================================================================

/// A visiting order: a permutation of `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trail {
    nodes: Vec<usize>,
}

/// One trail per agent, indexed by agent id.
pub type Generation = Vec<Trail>;

impl Trail {
    /// Wraps a node sequence after checking it is a permutation of
    /// `0..num_nodes`.
    pub fn new(nodes: Vec<usize>, num_nodes: usize) -> AcoResult<Self> {
        if !is_permutation(&nodes, num_nodes) {
            return Err(AcoError::InvalidTrail { nodes, num_nodes });
        }
        Ok(Self { nodes })
    }

    /// Wraps a sequence the caller already knows to be a permutation.
    pub(crate) fn from_permutation(nodes: Vec<usize>) -> Self {
        debug_assert!(is_permutation(&nodes, nodes.len()));
        Self { nodes }
    }

    /// Node sequence.
    #[inline]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `i` and `j` sit at adjacent positions, treating
    /// the last and first positions as adjacent.
    ///
    /// ```
    /// use u_aco::aco::Trail;
    ///
    /// let t = Trail::new(vec![2, 0, 3, 1], 4).unwrap();
    /// assert!(t.contains_edge(0, 3));
    /// assert!(t.contains_edge(1, 2)); // wrap-around
    /// assert!(!t.contains_edge(2, 3));
    /// ```
    pub fn contains_edge(&self, i: usize, j: usize) -> bool {
        let n = self.nodes.len();
        if i == j || n < 2 {
            return false;
        }
        let Some(idx) = self.nodes.iter().position(|&v| v == i) else {
            return false;
        };
        let pred = self.nodes[(idx + n - 1) % n];
        let succ = self.nodes[(idx + 1) % n];
        pred == j || succ == j
    }

    /// Distinct cyclic edges `(from, to)` in trail order.
    ///
    /// For two nodes the wrap edge is the same pair as the forward edge
    /// and is yielded once.
    pub fn cyclic_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.nodes.len();
        let wrap = if n > 2 {
            Some((self.nodes[n - 1], self.nodes[0]))
        } else {
            None
        };
        self.nodes.windows(2).map(|w| (w[0], w[1])).chain(wrap)
    }
}

impl AsRef<[usize]> for Trail {
    fn as_ref(&self) -> &[usize] {
        &self.nodes
    }
}

/// Checks that `nodes` holds every index in `0..n` exactly once.
pub fn is_permutation(nodes: &[usize], n: usize) -> bool {
    if nodes.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in nodes {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![2.0, 0.0, 6.0, 4.0],
            vec![9.0, 6.0, 0.0, 8.0],
            vec![10.0, 4.0, 8.0, 0.0],
        ]
    }

    #[test]
    fn test_distance_matrix_valid() {
        let d = DistanceMatrix::new(sample_rows()).unwrap();
        assert_eq!(d.len(), 4);
        for i in 0..4 {
            assert_eq!(d.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(d.get(i, j), d.get(j, i));
                if i != j {
                    assert!(d.get(i, j) > 0.0);
                }
            }
        }
        assert_eq!(d.row(1), &[2.0, 0.0, 6.0, 4.0]);
    }

    #[test]
    fn test_distance_matrix_too_small() {
        assert_eq!(
            DistanceMatrix::new(vec![vec![0.0]]).unwrap_err(),
            AcoError::TooFewNodes(1)
        );
        assert!(DistanceMatrix::from_fn(0, |_, _| 1.0).is_err());
    }

    #[test]
    fn test_distance_matrix_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(
            DistanceMatrix::new(rows),
            Err(AcoError::NotSquare { row: 1, len: 1, expected: 2 })
        ));
    }

    #[test]
    fn test_distance_matrix_asymmetric() {
        let mut rows = sample_rows();
        rows[2][3] = 7.0;
        assert!(matches!(
            DistanceMatrix::new(rows),
            Err(AcoError::Asymmetric { i: 2, j: 3, .. })
        ));
    }

    #[test]
    fn test_distance_matrix_non_positive() {
        let mut rows = sample_rows();
        rows[0][1] = 0.0;
        rows[1][0] = 0.0;
        assert!(matches!(
            DistanceMatrix::new(rows),
            Err(AcoError::NonPositiveDistance { i: 0, j: 1, .. })
        ));

        let mut rows = sample_rows();
        rows[3][1] = -4.0;
        assert!(DistanceMatrix::new(rows).is_err());

        assert!(DistanceMatrix::from_fn(3, |_, _| f64::NAN).is_err());
    }

    #[test]
    fn test_distance_matrix_diagonal() {
        let mut rows = sample_rows();
        rows[2][2] = 1.0;
        assert_eq!(
            DistanceMatrix::new(rows).unwrap_err(),
            AcoError::NonZeroDiagonal(2)
        );
    }

    #[test]
    fn test_from_fn_mirrors() {
        let d = DistanceMatrix::from_fn(5, |i, j| (i + j + 1) as f64).unwrap();
        assert_eq!(d.get(1, 3), 5.0);
        assert_eq!(d.get(3, 1), 5.0);
        assert_eq!(d.get(4, 4), 0.0);
    }

    #[test]
    fn test_pheromone_uniform_clamped() {
        let field = PheromoneField::uniform(3, 50.0, 0.1, 10.0);
        assert_eq!(field.len(), 3);
        assert_eq!(field.bounds(), (0.1, 10.0));
        assert!(field.row(0).iter().all(|&v| v == 10.0));
    }

    #[test]
    fn test_evaporate_and_deposit_clamps() {
        let mut field = PheromoneField::uniform(2, 1.0, 0.5, 2.0);
        let deposits = vec![0.0, 5.0, 5.0, 0.0];
        field.evaporate_and_deposit(0.1, &deposits, false);
        assert_eq!(field.get(0, 1), 2.0);
        assert_eq!(field.get(1, 0), 2.0);
        assert_eq!(field.get(0, 0), 0.5);
    }

    #[test]
    #[should_panic(expected = "does not match a 3x3 pheromone field")]
    fn test_evaporate_and_deposit_wrong_length() {
        let mut tau = PheromoneField::uniform(3, 1.0, 1e-4, 1e5);
        tau.evaporate_and_deposit(0.5, &[0.0; 4], false);
    }

    #[test]
    fn test_trail_new_rejects_non_permutation() {
        assert_eq!(
            Trail::new(vec![0, 1, 1], 3).unwrap_err(),
            AcoError::InvalidTrail {
                nodes: vec![0, 1, 1],
                num_nodes: 3
            }
        );
        assert!(Trail::new(vec![0, 1], 3).is_err());
        assert!(Trail::new(vec![0, 3, 1], 3).is_err());
        assert!(Trail::new(vec![2, 0, 1], 3).is_ok());
    }

    #[test]
    fn test_contains_edge_cyclic() {
        let t = Trail::new(vec![3, 1, 0, 2], 4).unwrap();
        assert!(t.contains_edge(3, 1));
        assert!(t.contains_edge(1, 3));
        assert!(t.contains_edge(0, 2));
        assert!(t.contains_edge(2, 3)); // last -> first
        assert!(t.contains_edge(3, 2)); // first -> last
        assert!(!t.contains_edge(3, 0));
        assert!(!t.contains_edge(1, 2));
        assert!(!t.contains_edge(1, 1));
        assert!(!t.contains_edge(7, 1));
    }

    #[test]
    fn test_contains_edge_interior_miss_is_false() {
        // node in the middle whose neighbours are not j
        let t = Trail::new(vec![0, 1, 2, 3, 4], 5).unwrap();
        assert!(!t.contains_edge(2, 4));
        assert!(!t.contains_edge(2, 0));
    }

    #[test]
    fn test_cyclic_edges() {
        let t = Trail::new(vec![2, 0, 1], 3).unwrap();
        let edges: Vec<_> = t.cyclic_edges().collect();
        assert_eq!(edges, vec![(2, 0), (0, 1), (1, 2)]);

        let pair = Trail::new(vec![1, 0], 2).unwrap();
        assert_eq!(pair.cyclic_edges().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn test_cyclic_edges_agree_with_contains_edge() {
        let t = Trail::new(vec![4, 2, 0, 3, 1], 5).unwrap();
        let edges: Vec<_> = t.cyclic_edges().collect();
        for i in 0..5 {
            for j in 0..5 {
                let listed = edges.contains(&(i, j)) || edges.contains(&(j, i));
                assert_eq!(listed, t.contains_edge(i, j), "pair ({i}, {j})");
            }
        }
    }
}
