//! Error types for ROI selection.

use mesh_cluster::ClusterError;
use mesh_distance::DistanceError;
use roi_types::RoiStoreError;
use thiserror::Error;

/// Result type alias for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Errors that abort a selection run.
///
/// Nothing is written to the ROI store when a run fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// A configuration option is out of range. Raised before any geometry
    /// is processed.
    #[error("invalid configuration: {option} = {value}: {reason}")]
    InvalidConfiguration {
        /// Name of the offending option.
        option: &'static str,
        /// The rejected value, formatted.
        value: String,
        /// Accepted range.
        reason: &'static str,
    },

    /// Distance field computation failed.
    #[error("distance stage failed: {0}")]
    Distance(#[from] DistanceError),

    /// Clustering failed.
    #[error("clustering stage failed: {0}")]
    Cluster(#[from] ClusterError),

    /// The ROI store could not answer a query.
    #[error("ROI lookup failed: {0}")]
    Lookup(#[from] RoiStoreError),

    /// Two boxes with zero volume were compared, so no overlap ratio exists.
    #[error("overlap ratio undefined for candidate {candidate}: both boxes have zero volume")]
    DegenerateOverlap {
        /// Index of the candidate being checked.
        candidate: usize,
    },
}

impl SelectionError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid(option: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidConfiguration {
            option,
            value: value.to_string(),
            reason,
        }
    }

    /// The pipeline stage the error came from.
    ///
    /// One of `"configuration"`, `"distance"`, `"clustering"`, `"lookup"` or
    /// `"overlap"`.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "configuration",
            Self::Distance(_) => "distance",
            Self::Cluster(_) => "clustering",
            Self::Lookup(_) => "lookup",
            Self::DegenerateOverlap { .. } => "overlap",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_types::ScanId;

    #[test]
    fn test_error_display() {
        let err = SelectionError::invalid("span", -3.0, "must be positive");
        let msg = format!("{err}");
        assert!(msg.contains("span = -3"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(SelectionError::invalid("span", 0, "x").stage(), "configuration");
        assert_eq!(
            SelectionError::from(DistanceError::InvalidPercentile(101)).stage(),
            "distance"
        );
        assert_eq!(
            SelectionError::from(ClusterError::invalid_params("x")).stage(),
            "clustering"
        );
        assert_eq!(
            SelectionError::from(RoiStoreError::ScanNotFound(ScanId::new(1))).stage(),
            "lookup"
        );
        assert_eq!(SelectionError::DegenerateOverlap { candidate: 0 }.stage(), "overlap");
    }
}
