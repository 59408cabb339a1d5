//! Overlap filtering against the batch and the stored ROIs.

use mesh_types::Aabb;
use roi_types::{RoiStore, ScanId};
use tracing::{debug, info};

use crate::{Candidate, RoiLimit, SelectionError, SelectionResult};

/// Candidates that survived the overlap filter, with rejection counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Accepted candidates in input order.
    pub accepted: Vec<Candidate>,
    /// Rejected for overlapping an earlier accepted candidate.
    pub rejected_by_batch: usize,
    /// Rejected for overlapping a stored ROI.
    pub rejected_by_existing: usize,
}

/// Greedy overlap filter.
///
/// Candidates are visited in order. Each is boxed as a cube of side `span`
/// around its position and accepted only if its overlap ratio with every
/// previously accepted box and with every stored ROI of the scan is at most
/// `max_overlap`. Stored ROIs are boxed the same way around their centers,
/// whatever span they were persisted with. Filtering stops once `limit`
/// candidates are accepted.
///
/// # Example
///
/// ```
/// use mesh_types::Point3;
/// use roi_select::{Candidate, OverlapFilter, RoiLimit};
/// use roi_types::{MemoryRoiStore, ScanId};
///
/// let scan = ScanId::new(1);
/// let mut store = MemoryRoiStore::new();
/// store.register_scan(scan);
///
/// let candidates = [
///     Candidate::at(Point3::new(0.0, 0.0, 0.0)),
///     Candidate::at(Point3::new(1.0, 0.0, 0.0)),
///     Candidate::at(Point3::new(50.0, 0.0, 0.0)),
/// ];
/// let filter = OverlapFilter::new(20.0, 0.5, RoiLimit::Unbounded);
/// let outcome = filter.filter(&candidates, scan, &store).unwrap();
///
/// assert_eq!(outcome.accepted.len(), 2);
/// assert_eq!(outcome.rejected_by_batch, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapFilter {
    span: f64,
    max_overlap: f64,
    limit: RoiLimit,
}

impl OverlapFilter {
    /// Create a filter.
    ///
    /// `max_overlap` is a ratio in `[0, 1]`; no validation happens here.
    #[must_use]
    pub const fn new(span: f64, max_overlap: f64, limit: RoiLimit) -> Self {
        Self {
            span,
            max_overlap,
            limit,
        }
    }

    /// Box side length used for candidates and stored ROIs.
    #[must_use]
    pub const fn span(&self) -> f64 {
        self.span
    }

    /// Filter `candidates` against each other and the stored ROIs of `scan`.
    ///
    /// With a limit of zero nothing is accepted and the store is not queried.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Lookup`] if the store query fails and
    /// [`SelectionError::DegenerateOverlap`] if two zero-volume boxes are
    /// compared.
    pub fn filter<S: RoiStore + ?Sized>(
        &self,
        candidates: &[Candidate],
        scan: ScanId,
        store: &S,
    ) -> SelectionResult<FilterOutcome> {
        let mut outcome = FilterOutcome::default();
        if self.limit.is_reached(0) {
            debug!("ROI limit is zero, skipping overlap filter");
            return Ok(outcome);
        }

        let mut accepted_boxes: Vec<Aabb> = Vec::new();

        for (index, candidate) in candidates.iter().enumerate() {
            if self.limit.is_reached(outcome.accepted.len()) {
                debug!(
                    remaining = candidates.len() - index,
                    "ROI limit reached, stopping"
                );
                break;
            }

            let candidate_box = Aabb::cube(candidate.position, self.span);

            if let Some(ratio) = self.first_excess(index, &candidate_box, accepted_boxes.iter())? {
                debug!(candidate = index, ratio, "Overlaps an accepted candidate");
                outcome.rejected_by_batch += 1;
                continue;
            }

            // Any stored center within `span` per axis can overlap
            let query = Aabb::cube(candidate.position, 2.0 * self.span);
            let existing = store.existing_rois(scan, &query)?;
            let existing_boxes: Vec<Aabb> = existing
                .iter()
                .map(|roi| Aabb::cube(roi.center, self.span))
                .collect();
            if let Some(ratio) = self.first_excess(index, &candidate_box, existing_boxes.iter())? {
                debug!(candidate = index, ratio, "Overlaps a stored ROI");
                outcome.rejected_by_existing += 1;
                continue;
            }

            accepted_boxes.push(candidate_box);
            outcome.accepted.push(*candidate);
        }

        info!(
            candidates = candidates.len(),
            accepted = outcome.accepted.len(),
            rejected_by_batch = outcome.rejected_by_batch,
            rejected_by_existing = outcome.rejected_by_existing,
            "Overlap filtering complete"
        );
        Ok(outcome)
    }

    /// First ratio above the threshold among `others`, if any.
    fn first_excess<'a>(
        &self,
        index: usize,
        candidate_box: &Aabb,
        others: impl Iterator<Item = &'a Aabb>,
    ) -> SelectionResult<Option<f64>> {
        for other in others {
            let ratio = candidate_box
                .overlap_ratio(other)
                .ok_or(SelectionError::DegenerateOverlap { candidate: index })?;
            if ratio > self.max_overlap {
                return Ok(Some(ratio));
            }
        }
        Ok(None)
    }
}
