//! Error types for distance field computation.

use thiserror::Error;

/// Result type alias for distance operations.
pub type DistanceResult<T> = Result<T, DistanceError>;

/// Errors that can occur while computing a distance field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
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

    /// A per-point array does not match the mesh point count.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Which array was wrong.
        what: &'static str,
        /// Mesh point (or cell) count.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// Percentile outside `0..=100`.
    #[error("percentile must be in 0..=100, got {0}")]
    InvalidPercentile(u8),

    /// Invalid parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl DistanceError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DistanceError::InvalidFace {
            face: 3,
            vertex: 12,
            vertex_count: 10,
        };
        let msg = format!("{err}");
        assert!(msg.contains("face 3"));
        assert!(msg.contains("12"));

        let err = DistanceError::length_mismatch("mask", 10, 4);
        assert!(format!("{err}").contains("expected 10"));

        let err = DistanceError::InvalidPercentile(140);
        assert!(format!("{err}").contains("140"));
    }
}
