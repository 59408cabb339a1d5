//! Clustering parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ClusterError, ClusterResult};

/// Distance range gating which points take part in clustering.
///
/// # Example
///
/// ```
/// use mesh_cluster::ClusterParams;
///
/// let params = ClusterParams::default().with_min_distance(2.0);
/// assert!(params.is_active(2.0));
/// assert!(!params.is_active(1.9));
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterParams {
    /// Inclusive lower bound on the distance of active points.
    ///
    /// Default: 1.0
    pub min_distance: f64,

    /// Inclusive upper bound on the distance of active points.
    ///
    /// Default: infinity
    pub max_distance: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_distance: 1.0,
            max_distance: f64::INFINITY,
        }
    }
}

impl ClusterParams {
    /// Create params for the range `[min_distance, max_distance]`.
    #[must_use]
    pub const fn new(min_distance: f64, max_distance: f64) -> Self {
        Self {
            min_distance,
            max_distance,
        }
    }

    /// Set the lower bound.
    #[must_use]
    pub const fn with_min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Set the upper bound.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Whether a point with this distance is active. NaN is never active.
    #[inline]
    #[must_use]
    pub fn is_active(&self, distance: f64) -> bool {
        distance >= self.min_distance && distance <= self.max_distance
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_distance` is negative or NaN, or if
    /// `max_distance` is NaN or below `min_distance`.
    pub fn validate(&self) -> ClusterResult<()> {
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return Err(ClusterError::invalid_params(format!(
                "min_distance must be non-negative, got {}",
                self.min_distance
            )));
        }
        if self.max_distance.is_nan() || self.max_distance < self.min_distance {
            return Err(ClusterError::invalid_params(format!(
                "max_distance ({}) must not be below min_distance ({})",
                self.max_distance, self.min_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ClusterParams::default();
        assert!((params.min_distance - 1.0).abs() < f64::EPSILON);
        assert!(params.max_distance.is_infinite());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_range_is_inclusive() {
        let params = ClusterParams::new(5.0, 10.0);
        assert!(params.is_active(5.0));
        assert!(params.is_active(10.0));
        assert!(!params.is_active(10.000_001));
        assert!(!params.is_active(f64::NAN));
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        assert!(ClusterParams::new(-0.5, 1.0).validate().is_err());
        assert!(ClusterParams::new(3.0, 2.0).validate().is_err());
        assert!(ClusterParams::new(f64::NAN, 2.0).validate().is_err());
        assert!(ClusterParams::new(2.0, 2.0).validate().is_ok());
    }
}
