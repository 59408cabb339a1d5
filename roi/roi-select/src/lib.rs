//! Distance-driven ROI selection.
//!
//! Given a subject surface, a reference surface and the ROIs already stored
//! for a scan, this crate proposes new ROI centers where the subject deviates
//! from the reference:
//!
//! - [`PatchSelector`] turns connected clusters of distant points into
//!   ranked candidates
//! - [`RandomPointSampler`] adds random surface points as controls
//! - [`OverlapFilter`] drops candidates whose cubes overlap each other or a
//!   stored ROI too much
//!
//! [`select_rois`] runs the whole chain. It only reads the store; the caller
//! persists the result.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use roi_select::{OverlapThreshold, SelectionConfig, select_rois};
//! use roi_types::{MemoryRoiStore, RoiStore, ScanId};
//!
//! // Reference plane, subject with a raised strip along one edge
//! let reference = IndexedMesh::planar_grid(12, 12, 1.0, [0.0, 0.0], 0.0);
//! let mut subject = reference.clone();
//! for v in &mut subject.vertices[..36] {
//!     v.position.z = 2.5;
//! }
//!
//! let scan = ScanId::new(1);
//! let mut store = MemoryRoiStore::new();
//! store.register_scan(scan);
//!
//! let config = SelectionConfig::default()
//!     .with_min_patch_size(5)
//!     .with_max_overlap(OverlapThreshold::Percent(10))
//!     .with_seed(3);
//!
//! let outcome = select_rois(&subject, &reference, scan, &store, &config)?;
//! assert_eq!(outcome.patch_candidates, 1);
//!
//! let ids = store.insert_rois(&outcome.into_rois(scan, None))?;
//! assert_eq!(ids.len(), 1);
//!
//! // Running again finds the same patch but it is already covered
//! let again = select_rois(&subject, &reference, scan, &store, &config)?;
//! assert!(again.is_empty());
//! assert_eq!(again.rejected_by_existing, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Logging
//!
//! Progress is reported through `tracing`: `info!` for stage summaries,
//! `debug!` for individual rejections, `warn!` for degenerate input. No
//! subscriber is installed here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod overlap;
mod patch;
mod pipeline;
mod result;
mod sampler;

pub use config::{OverlapThreshold, RepresentativePoint, RoiLimit, SelectionConfig};
pub use error::{SelectionError, SelectionResult};
pub use overlap::{FilterOutcome, OverlapFilter};
pub use patch::PatchSelector;
pub use pipeline::select_rois;
pub use result::{Candidate, CandidateSource, SelectionOutcome};
pub use sampler::RandomPointSampler;
