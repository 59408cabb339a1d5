//! In-memory ROI store.

use hashbrown::HashMap;
use mesh_types::Aabb;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NewRoi, Roi, RoiId, RoiStore, RoiStoreError, RoiStoreResult, ScanId};

/// An [`RoiStore`] holding everything in a hash map keyed by scan.
///
/// Scans must be registered before ROIs can be stored or queried for them.
/// Ids are assigned sequentially starting at 1.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryRoiStore {
    scans: HashMap<ScanId, Vec<Roi>>,
    next_id: u64,
}

impl MemoryRoiStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a scan known to the store. Registering twice is a no-op.
    pub fn register_scan(&mut self, scan: ScanId) {
        self.scans.entry(scan).or_default();
    }

    /// Whether the scan is registered.
    #[must_use]
    pub fn has_scan(&self, scan: ScanId) -> bool {
        self.scans.contains_key(&scan)
    }

    /// All ROIs of a scan in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RoiStoreError::ScanNotFound`] for unknown scans.
    pub fn rois(&self, scan: ScanId) -> RoiStoreResult<&[Roi]> {
        self.scans
            .get(&scan)
            .map(Vec::as_slice)
            .ok_or(RoiStoreError::ScanNotFound(scan))
    }

    /// Total number of ROIs across all scans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scans.values().map(Vec::len).sum()
    }

    /// True when no ROIs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RoiStore for MemoryRoiStore {
    fn existing_rois(&self, scan: ScanId, query: &Aabb) -> RoiStoreResult<Vec<Roi>> {
        let rois = self.rois(scan)?;
        Ok(rois
            .iter()
            .filter(|roi| roi.bounds().intersects(query))
            .copied()
            .collect())
    }

    fn count_rois(&self, scan: ScanId) -> RoiStoreResult<usize> {
        self.rois(scan).map(<[Roi]>::len)
    }

    fn insert_roi(&mut self, roi: NewRoi) -> RoiStoreResult<RoiId> {
        roi.validate()?;
        let rois = self
            .scans
            .get_mut(&roi.scan)
            .ok_or(RoiStoreError::ScanNotFound(roi.scan))?;

        self.next_id += 1;
        let id = RoiId::new(self.next_id);
        rois.push(roi.with_id(id));

        debug!(
            roi = id.raw(),
            scan = roi.scan.raw(),
            x = roi.center.x,
            y = roi.center.y,
            z = roi.center.z,
            span = roi.span,
            "ROI stored"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Point3;

    fn store_with_scan(scan: ScanId) -> MemoryRoiStore {
        let mut store = MemoryRoiStore::new();
        store.register_scan(scan);
        store
    }

    #[test]
    fn ids_are_sequential() {
        let scan = ScanId::new(1);
        let mut store = store_with_scan(scan);
        let a = store.insert_roi(NewRoi::new(scan, Point3::origin(), 10.0)).unwrap();
        let b = store.insert_roi(NewRoi::new(scan, Point3::new(50.0, 0.0, 0.0), 10.0)).unwrap();
        assert_eq!(a, RoiId(1));
        assert_eq!(b, RoiId(2));
        assert_eq!(store.count_rois(scan).unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookup_filters_by_box_and_scan() {
        let scan = ScanId::new(1);
        let other = ScanId::new(2);
        let mut store = store_with_scan(scan);
        store.register_scan(other);

        store.insert_roi(NewRoi::new(scan, Point3::origin(), 10.0)).unwrap();
        store.insert_roi(NewRoi::new(scan, Point3::new(100.0, 0.0, 0.0), 10.0)).unwrap();
        store.insert_roi(NewRoi::new(other, Point3::origin(), 10.0)).unwrap();

        let query = Aabb::cube(Point3::new(3.0, 0.0, 0.0), 10.0);
        let found = store.existing_rois(scan, &query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].scan, scan);
        assert_eq!(found[0].id, RoiId(1));
    }

    #[test]
    fn lookup_includes_touching_boxes() {
        let scan = ScanId::new(1);
        let mut store = store_with_scan(scan);
        store.insert_roi(NewRoi::new(scan, Point3::origin(), 10.0)).unwrap();

        let touching = Aabb::cube(Point3::new(10.0, 0.0, 0.0), 10.0);
        assert_eq!(store.existing_rois(scan, &touching).unwrap().len(), 1);

        let apart = Aabb::cube(Point3::new(10.5, 0.0, 0.0), 10.0);
        assert!(store.existing_rois(scan, &apart).unwrap().is_empty());
    }

    #[test]
    fn unknown_scan_is_an_error() {
        let mut store = MemoryRoiStore::new();
        let scan = ScanId::new(9);
        let query = Aabb::cube(Point3::origin(), 1.0);
        assert_eq!(
            store.existing_rois(scan, &query).unwrap_err(),
            RoiStoreError::ScanNotFound(scan)
        );
        assert!(store.count_rois(scan).is_err());
        assert!(store.insert_roi(NewRoi::new(scan, Point3::origin(), 1.0)).is_err());
    }

    #[test]
    fn invalid_roi_rejected_without_consuming_an_id() {
        let scan = ScanId::new(1);
        let mut store = store_with_scan(scan);
        assert!(store.insert_roi(NewRoi::new(scan, Point3::origin(), -2.0)).is_err());
        let id = store.insert_roi(NewRoi::new(scan, Point3::origin(), 2.0)).unwrap();
        assert_eq!(id, RoiId(1));
    }

    #[test]
    fn insert_rois_stops_at_first_failure() {
        let scan = ScanId::new(1);
        let mut store = store_with_scan(scan);
        let batch = [
            NewRoi::new(scan, Point3::origin(), 2.0),
            NewRoi::new(ScanId::new(5), Point3::origin(), 2.0),
            NewRoi::new(scan, Point3::new(9.0, 0.0, 0.0), 2.0),
        ];
        assert!(store.insert_rois(&batch).is_err());
        assert_eq!(store.count_rois(scan).unwrap(), 1);
    }
}
