//! Distance field parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DistanceError, DistanceResult};

/// Parameters for distance field computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceParams {
    /// Maximum triangles per BVH leaf.
    ///
    /// Default: 8
    pub max_leaf_size: usize,
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self { max_leaf_size: 8 }
    }
}

impl DistanceParams {
    /// Create new params with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the BVH leaf size.
    #[must_use]
    pub const fn with_max_leaf_size(mut self, size: usize) -> Self {
        self.max_leaf_size = size;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the leaf size is zero.
    pub fn validate(&self) -> DistanceResult<()> {
        if self.max_leaf_size == 0 {
            return Err(DistanceError::invalid_params(
                "max_leaf_size must be at least 1",
            ));
        }
        Ok(())
    }
}
