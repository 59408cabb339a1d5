//! The persistence seam.

use mesh_types::Aabb;

use crate::{NewRoi, Roi, RoiId, RoiStoreResult, ScanId};

/// Read/write access to persisted ROIs.
///
/// Selection only ever calls [`existing_rois`](Self::existing_rois) and
/// [`count_rois`](Self::count_rois); writes are issued by the caller after
/// a run succeeds. Calls are synchronous and may be slow (a database round
/// trip); no retry or timeout is applied by callers in this workspace.
///
/// Implementations serialize writers per scan if concurrent selection runs
/// against the same scan must not race on the overlap check.
pub trait RoiStore {
    /// All ROIs of `scan` whose box intersects `query`.
    ///
    /// Boxes that only touch `query` must be included. Returning extra ROIs
    /// is allowed; missing a true overlap is not.
    ///
    /// # Errors
    ///
    /// Returns [`RoiStoreError::ScanNotFound`](crate::RoiStoreError::ScanNotFound)
    /// for unknown scans, or a backend error.
    fn existing_rois(&self, scan: ScanId, query: &Aabb) -> RoiStoreResult<Vec<Roi>>;

    /// Number of ROIs stored for `scan`.
    ///
    /// # Errors
    ///
    /// Same as [`existing_rois`](Self::existing_rois).
    fn count_rois(&self, scan: ScanId) -> RoiStoreResult<usize>;

    /// Persist one ROI and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown scans, malformed records, or backend
    /// failures.
    fn insert_roi(&mut self, roi: NewRoi) -> RoiStoreResult<RoiId>;

    /// Persist several ROIs in order.
    ///
    /// The default implementation inserts one at a time and stops at the
    /// first failure; earlier inserts are not rolled back.
    ///
    /// # Errors
    ///
    /// Returns the first insert error.
    fn insert_rois(&mut self, rois: &[NewRoi]) -> RoiStoreResult<Vec<RoiId>> {
        rois.iter().map(|roi| self.insert_roi(*roi)).collect()
    }
}
