//! Error types for u-aco.
//!
//! Errors only arise while validating inputs. Once a [`DistanceMatrix`]
//! and an [`AcoConfig`] have been accepted, no core operation fails.
//!
//! [`DistanceMatrix`]: crate::aco::DistanceMatrix
//! [`AcoConfig`]: crate::aco::AcoConfig

use thiserror::Error;

/// Result type alias for u-aco operations.
pub type AcoResult<T> = Result<T, AcoError>;

/// Validation failures reported before any run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The graph has fewer than two nodes.
    #[error("distance matrix needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    /// A row does not have exactly `expected` entries.
    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Actual row length.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },

    /// A diagonal entry is not zero.
    #[error("distance from node {0} to itself must be 0")]
    NonZeroDiagonal(usize),

    /// An off-diagonal entry is zero, negative, NaN or infinite.
    #[error("distance between {i} and {j} must be positive and finite, got {value}")]
    NonPositiveDistance {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Offending value.
        value: f64,
    },

    /// A node sequence is not a permutation of `0..num_nodes`.
    #[error("trail {nodes:?} is not a permutation of 0..{num_nodes}")]
    InvalidTrail {
        /// Offending sequence.
        nodes: Vec<usize>,
        /// Expected node count.
        num_nodes: usize,
    },

    /// `dist[i][j] != dist[j][i]`.
    #[error("distance matrix is asymmetric at ({i}, {j}): {forward} vs {backward}")]
    Asymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// `dist[i][j]`.
        forward: f64,
        /// `dist[j][i]`.
        backward: f64,
    },
}

impl AcoError {
    /// Returns `true` for configuration (as opposed to matrix) errors.
    pub fn is_config(&self) -> bool {
        matches!(self, AcoError::Config(_))
    }
}
