//! Region-of-interest records and storage.
//!
//! An ROI is an axis-aligned cube (center plus side length) on one scan.
//! Selection reads existing ROIs through the [`RoiStore`] trait and hands
//! back new [`NewRoi`] records for the caller to persist; the store is the
//! only state shared between selection runs.
//!
//! [`MemoryRoiStore`] is an in-process implementation used by tests and by
//! callers that keep ROIs in memory. Database-backed stores implement the
//! same trait.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Aabb, Point3};
//! use roi_types::{MemoryRoiStore, NewRoi, RoiStore, ScanId};
//!
//! let scan = ScanId::new(7);
//! let mut store = MemoryRoiStore::new();
//! store.register_scan(scan);
//!
//! store.insert_roi(NewRoi::new(scan, Point3::new(0.0, 0.0, 0.0), 20.0)).unwrap();
//!
//! let query = Aabb::cube(Point3::new(5.0, 5.0, 5.0), 20.0);
//! let found = store.existing_rois(scan, &query).unwrap();
//! assert_eq!(found.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod ids;
mod memory;
mod roi;
mod store;

pub use error::{RoiStoreError, RoiStoreResult};
pub use ids::{CommandId, RoiId, ScanId};
pub use memory::MemoryRoiStore;
pub use roi::{NewRoi, Roi};
pub use store::RoiStore;
