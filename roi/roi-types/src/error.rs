//! Error types for ROI storage.

use thiserror::Error;

use crate::ScanId;

/// Result type alias for ROI store operations.
pub type RoiStoreResult<T> = Result<T, RoiStoreError>;

/// Errors raised by an [`RoiStore`](crate::RoiStore).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoiStoreError {
    /// The referenced scan is not known to the store.
    #[error("scan not found: {0}")]
    ScanNotFound(ScanId),

    /// An ROI record is malformed.
    #[error("invalid ROI: {reason}")]
    InvalidRoi {
        /// What is wrong with the record.
        reason: String,
    },

    /// The storage backend failed.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

impl RoiStoreError {
    /// Create an invalid ROI error.
    #[must_use]
    pub fn invalid_roi(reason: impl Into<String>) -> Self {
        Self::InvalidRoi {
            reason: reason.into(),
        }
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(details: impl Into<String>) -> Self {
        Self::Backend(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoiStoreError::ScanNotFound(ScanId::new(4));
        assert!(format!("{err}").contains("Scan(4)"));

        let err = RoiStoreError::invalid_roi("span must be positive");
        assert!(format!("{err}").contains("span must be positive"));

        let err = RoiStoreError::backend("connection reset");
        assert!(format!("{err}").contains("connection reset"));
    }
}
