//! Error types for connectivity clustering.

use thiserror::Error;

/// Result type alias for clustering operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur during clustering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// The scalar field does not have one value per mesh point.
    #[error("distance field has {actual} values, mesh has {expected} vertices")]
    FieldLengthMismatch {
        /// Mesh point count.
        expected: usize,
        /// Field length supplied.
        actual: usize,
    },

    /// A cell references a point index outside the point array.
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    InvalidFace {
        /// Offending cell.
        face: usize,
        /// Out-of-range vertex index.
        vertex: u32,
        /// Number of points in the mesh.
        vertex_count: usize,
    },

    /// Invalid clustering parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl ClusterError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
