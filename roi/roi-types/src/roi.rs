//! ROI records.

use mesh_types::{Aabb, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CommandId, RoiId, RoiStoreError, RoiStoreResult, ScanId};

/// A persisted region of interest.
///
/// Written once, never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roi {
    /// Store-assigned identifier.
    pub id: RoiId,
    /// Scan this ROI belongs to.
    pub scan: ScanId,
    /// Cube center.
    pub center: Point3<f64>,
    /// Cube side length.
    pub span: f64,
    /// Command that produced the ROI, if recorded.
    pub command: Option<CommandId>,
}

impl Roi {
    /// The ROI's axis-aligned box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.center, self.span)
    }
}

/// An ROI about to be persisted; the store assigns its id.
///
/// # Example
///
/// ```
/// use mesh_types::Point3;
/// use roi_types::{CommandId, NewRoi, ScanId};
///
/// let roi = NewRoi::new(ScanId::new(1), Point3::new(1.0, 2.0, 3.0), 20.0)
///     .with_command(CommandId::new(5));
///
/// assert_eq!(roi.command, Some(CommandId::new(5)));
/// assert!(roi.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewRoi {
    /// Scan this ROI belongs to.
    pub scan: ScanId,
    /// Cube center.
    pub center: Point3<f64>,
    /// Cube side length.
    pub span: f64,
    /// Command that produced the ROI, if recorded.
    pub command: Option<CommandId>,
}

impl NewRoi {
    /// Create a record without a command reference.
    #[must_use]
    pub const fn new(scan: ScanId, center: Point3<f64>, span: f64) -> Self {
        Self {
            scan,
            center,
            span,
            command: None,
        }
    }

    /// Attach the producing command.
    #[must_use]
    pub const fn with_command(mut self, command: CommandId) -> Self {
        self.command = Some(command);
        self
    }

    /// The ROI's axis-aligned box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.center, self.span)
    }

    /// Check that the record describes a proper cube.
    ///
    /// # Errors
    ///
    /// Returns [`RoiStoreError::InvalidRoi`] if the span is not a positive
    /// finite number or the center has a non-finite coordinate.
    pub fn validate(&self) -> RoiStoreResult<()> {
        if !(self.span.is_finite() && self.span > 0.0) {
            return Err(RoiStoreError::invalid_roi(format!(
                "span must be positive and finite, got {}",
                self.span
            )));
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(RoiStoreError::invalid_roi("center must be finite"));
        }
        Ok(())
    }

    /// Turn into a persisted record with the given id.
    #[must_use]
    pub const fn with_id(self, id: RoiId) -> Roi {
        Roi {
            id,
            scan: self.scan,
            center: self.center,
            span: self.span,
            command: self.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn roi_bounds_are_centered_cube() {
        let roi = NewRoi::new(ScanId::new(1), Point3::new(10.0, 0.0, -5.0), 4.0).with_id(RoiId(3));
        let b = roi.bounds();
        assert_relative_eq!(b.min.x, 8.0);
        assert_relative_eq!(b.max.z, -3.0);
        assert_eq!(roi.id, RoiId(3));
    }

    #[test]
    fn validate_rejects_bad_records() {
        let scan = ScanId::new(1);
        assert!(NewRoi::new(scan, Point3::origin(), 0.0).validate().is_err());
        assert!(NewRoi::new(scan, Point3::origin(), -1.0).validate().is_err());
        assert!(NewRoi::new(scan, Point3::origin(), f64::INFINITY).validate().is_err());
        assert!(NewRoi::new(scan, Point3::new(f64::NAN, 0.0, 0.0), 1.0)
            .validate()
            .is_err());
    }
}
