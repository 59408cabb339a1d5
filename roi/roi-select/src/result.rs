//! Candidates and selection outcomes.

use mesh_types::Point3;
use roi_types::{CommandId, NewRoi, ScanId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RoiLimit;

/// Where a candidate point came from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CandidateSource {
    /// Representative of a distant surface patch.
    Patch {
        /// Cluster id within the run.
        cluster: u32,
        /// Number of points in the patch.
        size: usize,
        /// Area of the patch.
        area: f64,
        /// Largest distance to the reference within the patch.
        max_distance: f64,
    },
    /// Randomly sampled surface point.
    Random {
        /// Index of the sampled subject point.
        point: u32,
    },
    /// Point chosen by the caller rather than by the selection run.
    External,
}

/// A proposed ROI center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// ROI center.
    pub position: Point3<f64>,
    /// Provenance.
    pub source: CandidateSource,
}

impl Candidate {
    /// A randomly sampled candidate.
    #[must_use]
    pub const fn random(position: Point3<f64>, point: u32) -> Self {
        Self {
            position,
            source: CandidateSource::Random { point },
        }
    }

    /// An externally chosen candidate, e.g. for feeding hand-picked points
    /// through the overlap filter.
    #[must_use]
    pub const fn at(position: Point3<f64>) -> Self {
        Self {
            position,
            source: CandidateSource::External,
        }
    }

    /// True for randomly sampled candidates.
    #[must_use]
    pub const fn is_random(&self) -> bool {
        matches!(self.source, CandidateSource::Random { .. })
    }
}

/// Result of a selection run.
///
/// Holds the accepted candidates in acceptance order plus counters for
/// reporting. Nothing has been persisted yet; see
/// [`into_rois`](Self::into_rois).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionOutcome {
    /// Accepted candidates, in the order they were accepted.
    pub accepted: Vec<Candidate>,
    /// Side length of the ROI cubes to persist.
    pub span: f64,
    /// Distance floor actually used for clustering.
    pub distance_floor: f64,
    /// Clusters found before patch filtering.
    pub clusters_found: usize,
    /// Candidates contributed by patches.
    pub patch_candidates: usize,
    /// Candidates contributed by random sampling.
    pub random_candidates: usize,
    /// Candidates dropped for overlapping an earlier accepted one.
    pub rejected_by_batch: usize,
    /// Candidates dropped for overlapping a stored ROI.
    pub rejected_by_existing: usize,
    /// Effective cap applied by the overlap filter.
    pub limit: RoiLimit,
}

impl SelectionOutcome {
    /// An outcome with nothing accepted.
    #[must_use]
    pub const fn empty(span: f64, distance_floor: f64, limit: RoiLimit) -> Self {
        Self {
            accepted: Vec::new(),
            span,
            distance_floor,
            clusters_found: 0,
            patch_candidates: 0,
            random_candidates: 0,
            rejected_by_batch: 0,
            rejected_by_existing: 0,
            limit,
        }
    }

    /// Number of accepted candidates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// True when nothing was accepted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Number of accepted candidates that were sampled randomly.
    #[must_use]
    pub fn accepted_random(&self) -> usize {
        self.accepted.iter().filter(|c| c.is_random()).count()
    }

    /// Accepted centers in order.
    pub fn points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.accepted.iter().map(|c| c.position)
    }

    /// Build ROI records for the caller to persist.
    ///
    /// ```
    /// use mesh_types::Point3;
    /// use roi_select::{Candidate, RoiLimit, SelectionOutcome};
    /// use roi_types::{CommandId, ScanId};
    ///
    /// let mut outcome = SelectionOutcome::empty(20.0, 1.0, RoiLimit::Unbounded);
    /// outcome.accepted.push(Candidate::at(Point3::new(1.0, 2.0, 3.0)));
    ///
    /// let rois = outcome.into_rois(ScanId::new(4), Some(CommandId::new(2)));
    /// assert_eq!(rois.len(), 1);
    /// assert_eq!(rois[0].span, 20.0);
    /// assert_eq!(rois[0].command, Some(CommandId::new(2)));
    /// ```
    #[must_use]
    pub fn into_rois(self, scan: ScanId, command: Option<CommandId>) -> Vec<NewRoi> {
        let span = self.span;
        self.accepted
            .into_iter()
            .map(|c| NewRoi {
                scan,
                center: c.position,
                span,
                command,
            })
            .collect()
    }
}
