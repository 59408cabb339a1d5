//! Selection configuration.

use mesh_distance::PointMask;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SelectionError, SelectionResult};

/// Maximum allowed overlap between two ROI boxes.
///
/// Either a ratio in `[0, 1]` or a whole percentage in `0..=100`; resolved
/// once to a ratio by [`resolve`](Self::resolve).
///
/// # Example
///
/// ```
/// use roi_select::OverlapThreshold;
///
/// assert_eq!(OverlapThreshold::Percent(25).resolve().unwrap(), 0.25);
/// assert_eq!(OverlapThreshold::Ratio(0.1).resolve().unwrap(), 0.1);
/// assert!(OverlapThreshold::Ratio(1.5).resolve().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverlapThreshold {
    /// Jaccard ratio in `[0, 1]`.
    Ratio(f64),
    /// Percentage in `0..=100`.
    Percent(u8),
}

impl Default for OverlapThreshold {
    fn default() -> Self {
        Self::Percent(50)
    }
}

impl OverlapThreshold {
    /// The threshold as a ratio in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidConfiguration`] for ratios outside
    /// `[0, 1]` (or NaN) and percentages above 100.
    pub fn resolve(self) -> SelectionResult<f64> {
        match self {
            Self::Ratio(r) if (0.0..=1.0).contains(&r) => Ok(r),
            Self::Ratio(r) => Err(SelectionError::invalid(
                "max_overlap",
                r,
                "ratio must be in [0, 1]",
            )),
            Self::Percent(p) if p <= 100 => Ok(f64::from(p) / 100.0),
            Self::Percent(p) => Err(SelectionError::invalid(
                "max_overlap",
                format!("{p}%"),
                "percentage must be in 0..=100",
            )),
        }
    }
}

/// Cap on the number of ROIs accepted in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoiLimit {
    /// No cap.
    #[default]
    Unbounded,
    /// At most this many; zero means the run accepts nothing.
    AtMost(usize),
}

impl RoiLimit {
    /// Map a signed count: negative is unbounded, anything else a cap.
    ///
    /// ```
    /// use roi_select::RoiLimit;
    ///
    /// assert_eq!(RoiLimit::from_count(-1), RoiLimit::Unbounded);
    /// assert_eq!(RoiLimit::from_count(0), RoiLimit::AtMost(0));
    /// assert_eq!(RoiLimit::from_count(7), RoiLimit::AtMost(7));
    /// ```
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        usize::try_from(count).map_or(Self::Unbounded, Self::AtMost)
    }

    /// The tighter of two limits.
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unbounded, x) | (x, Self::Unbounded) => x,
            (Self::AtMost(a), Self::AtMost(b)) => Self::AtMost(if a < b { a } else { b }),
        }
    }

    /// Whether `count` accepted items already reach the limit.
    #[inline]
    #[must_use]
    pub const fn is_reached(self, count: usize) -> bool {
        match self {
            Self::Unbounded => false,
            Self::AtMost(n) => count >= n,
        }
    }
}

/// Which point of a patch becomes the ROI center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepresentativePoint {
    /// The member point farthest from the reference surface.
    #[default]
    MaxDistance,
    /// The mean position of all member points.
    Centroid,
    /// Halfway between the farthest point and its closest reference point.
    Midpoint,
}

/// Options for a selection run.
///
/// # Example
///
/// ```
/// use roi_select::{OverlapThreshold, RoiLimit, SelectionConfig};
///
/// let config = SelectionConfig::default()
///     .with_min_distance(2.0)
///     .with_span(30.0)
///     .with_max_overlap(OverlapThreshold::Ratio(0.2))
///     .with_max_new_rois(RoiLimit::AtMost(5))
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.overlap_box_span(), 30.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionConfig {
    /// Lower bound on the distance of clustered points.
    ///
    /// Default: 1.0
    pub min_distance: f64,

    /// Upper bound on the distance of clustered points.
    ///
    /// Default: infinity
    pub max_distance: f64,

    /// Patches must have strictly more points than this.
    ///
    /// Default: 10
    pub min_patch_size: usize,

    /// Patches must have strictly more area than this.
    ///
    /// Default: 0.0
    pub min_patch_area: f64,

    /// Side length of the ROI cubes that get persisted.
    ///
    /// Default: 20.0
    pub span: f64,

    /// Side length of the boxes used for overlap checks; `span` if unset.
    ///
    /// Applies to candidates and stored ROIs alike.
    ///
    /// Default: None
    pub overlap_span: Option<f64>,

    /// Maximum overlap between accepted boxes.
    ///
    /// Default: 50%
    pub max_overlap: OverlapThreshold,

    /// Cap on ROIs accepted in this run.
    ///
    /// Default: unbounded
    pub max_new_rois: RoiLimit,

    /// Cap on the total ROIs of the scan, counting those already stored.
    ///
    /// Default: None
    pub max_scan_rois: Option<usize>,

    /// Random surface points appended after the patch candidates.
    ///
    /// Default: 0
    pub random_sample_count: usize,

    /// Top up with random points when patches yield fewer candidates.
    ///
    /// Default: 0
    pub min_candidates: usize,

    /// Spread random points over spatial bins.
    ///
    /// Default: true
    pub stratified: bool,

    /// Seed for random sampling; entropy if unset.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// How patch candidates are positioned.
    ///
    /// Default: [`RepresentativePoint::MaxDistance`]
    pub representative: RepresentativePoint,

    /// Raise the distance floor to this percentile of the field.
    ///
    /// Default: None
    pub distance_percentile: Option<u8>,

    /// Subject points to consider; all if unset.
    ///
    /// Default: None
    pub point_mask: Option<PointMask>,

    /// Erosion iterations applied to `point_mask`.
    ///
    /// Default: 0
    pub mask_erosion: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_distance: 1.0,
            max_distance: f64::INFINITY,
            min_patch_size: 10,
            min_patch_area: 0.0,
            span: 20.0,
            overlap_span: None,
            max_overlap: OverlapThreshold::default(),
            max_new_rois: RoiLimit::Unbounded,
            max_scan_rois: None,
            random_sample_count: 0,
            min_candidates: 0,
            stratified: true,
            seed: None,
            representative: RepresentativePoint::MaxDistance,
            distance_percentile: None,
            point_mask: None,
            mask_erosion: 0,
        }
    }
}

impl SelectionConfig {
    /// Create a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower distance bound.
    #[must_use]
    pub const fn with_min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Set the upper distance bound.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set the exclusive minimum patch size.
    #[must_use]
    pub const fn with_min_patch_size(mut self, size: usize) -> Self {
        self.min_patch_size = size;
        self
    }

    /// Set the exclusive minimum patch area.
    #[must_use]
    pub const fn with_min_patch_area(mut self, area: f64) -> Self {
        self.min_patch_area = area;
        self
    }

    /// Set the ROI cube side length.
    #[must_use]
    pub const fn with_span(mut self, span: f64) -> Self {
        self.span = span;
        self
    }

    /// Set a separate box side length for overlap checks.
    #[must_use]
    pub const fn with_overlap_span(mut self, span: f64) -> Self {
        self.overlap_span = Some(span);
        self
    }

    /// Set the overlap threshold.
    #[must_use]
    pub const fn with_max_overlap(mut self, threshold: OverlapThreshold) -> Self {
        self.max_overlap = threshold;
        self
    }

    /// Set the per-run ROI cap.
    #[must_use]
    pub const fn with_max_new_rois(mut self, limit: RoiLimit) -> Self {
        self.max_new_rois = limit;
        self
    }

    /// Set the per-scan ROI cap.
    #[must_use]
    pub const fn with_max_scan_rois(mut self, max: usize) -> Self {
        self.max_scan_rois = Some(max);
        self
    }

    /// Set the number of random candidates.
    #[must_use]
    pub const fn with_random_sample_count(mut self, count: usize) -> Self {
        self.random_sample_count = count;
        self
    }

    /// Set the candidate count to top up to with random points.
    #[must_use]
    pub const fn with_min_candidates(mut self, count: usize) -> Self {
        self.min_candidates = count;
        self
    }

    /// Enable or disable stratified random sampling.
    #[must_use]
    pub const fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Seed the random sampler.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose how patch candidates are positioned.
    #[must_use]
    pub const fn with_representative(mut self, representative: RepresentativePoint) -> Self {
        self.representative = representative;
        self
    }

    /// Raise the distance floor to a percentile of the field.
    #[must_use]
    pub const fn with_distance_percentile(mut self, percentile: u8) -> Self {
        self.distance_percentile = Some(percentile);
        self
    }

    /// Restrict the run to masked points, eroded `erosion` times.
    #[must_use]
    pub fn with_point_mask(mut self, mask: PointMask, erosion: usize) -> Self {
        self.point_mask = Some(mask);
        self.mask_erosion = erosion;
        self
    }

    /// Box side length used for overlap checks.
    #[inline]
    #[must_use]
    pub fn overlap_box_span(&self) -> f64 {
        self.overlap_span.unwrap_or(self.span)
    }

    /// Validate every option and resolve the overlap threshold.
    ///
    /// Returns the threshold as a ratio.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidConfiguration`] naming the first
    /// out-of-range option.
    pub fn validate(&self) -> SelectionResult<f64> {
        if !(self.span.is_finite() && self.span > 0.0) {
            return Err(SelectionError::invalid(
                "span",
                self.span,
                "must be positive and finite",
            ));
        }
        if let Some(span) = self.overlap_span {
            if !(span.is_finite() && span > 0.0) {
                return Err(SelectionError::invalid(
                    "overlap_span",
                    span,
                    "must be positive and finite",
                ));
            }
        }
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return Err(SelectionError::invalid(
                "min_distance",
                self.min_distance,
                "must be non-negative",
            ));
        }
        if self.max_distance.is_nan() || self.max_distance < self.min_distance {
            return Err(SelectionError::invalid(
                "max_distance",
                self.max_distance,
                "must not be below min_distance",
            ));
        }
        if self.min_patch_size == 0 {
            return Err(SelectionError::invalid(
                "min_patch_size",
                self.min_patch_size,
                "must be at least 1",
            ));
        }
        if self.min_patch_area.is_nan() {
            return Err(SelectionError::invalid(
                "min_patch_area",
                self.min_patch_area,
                "must be a number",
            ));
        }
        if let Some(p) = self.distance_percentile {
            if p > 100 {
                return Err(SelectionError::invalid(
                    "distance_percentile",
                    p,
                    "must be in 0..=100",
                ));
            }
        }
        self.max_overlap.resolve()
    }
}
