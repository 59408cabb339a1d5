//! Per-point distance fields.

use mesh_types::{IndexedMesh, MeshTopology, Point3};
use tracing::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bvh::TriangleBvh;
use crate::{DistanceError, DistanceParams, DistanceResult, PointMask};

/// Unsigned distance from each subject point to the reference surface.
///
/// Indexed like the subject mesh's point array. Alongside each distance the
/// field keeps the closest reference point, which callers use to place ROI
/// centers between the two surfaces.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceField {
    distances: Vec<f64>,
    closest: Vec<Point3<f64>>,
}

impl DistanceField {
    /// A field with no points.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            distances: Vec::new(),
            closest: Vec::new(),
        }
    }

    /// Build a field from raw distances.
    ///
    /// Closest points are unknown and set to the origin; use this for
    /// distances computed elsewhere.
    #[must_use]
    pub fn from_distances(distances: Vec<f64>) -> Self {
        let closest = vec![Point3::origin(); distances.len()];
        Self { distances, closest }
    }

    /// Number of points in the field.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True when the field has no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// All distances, indexed by subject point.
    #[inline]
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Distance of point `index`.
    #[inline]
    #[must_use]
    pub fn distance(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied()
    }

    /// Closest reference point to subject point `index`.
    #[inline]
    #[must_use]
    pub fn closest_point(&self, index: usize) -> Option<Point3<f64>> {
        self.closest.get(index).copied()
    }

    /// Largest distance in the field.
    #[must_use]
    pub fn max_distance(&self) -> Option<f64> {
        self.distances.iter().copied().reduce(f64::max)
    }

    /// Percentile of the distances with linear interpolation.
    ///
    /// Uses rank `p / 100 * (n + 1)` over the ascending distances: ranks
    /// below 1 give the minimum, ranks at or beyond `n` give the maximum.
    /// Returns `Ok(None)` for an empty field.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::InvalidPercentile`] if `p > 100`.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_distance::DistanceField;
    ///
    /// let field = DistanceField::from_distances((1..=9_i32).map(f64::from).collect());
    /// assert_eq!(field.percentile(50).unwrap(), Some(5.0));
    /// assert_eq!(field.percentile(25).unwrap(), Some(2.5));
    /// ```
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn percentile(&self, p: u8) -> DistanceResult<Option<f64>> {
        if p > 100 {
            return Err(DistanceError::InvalidPercentile(p));
        }
        if self.distances.is_empty() {
            return Ok(None);
        }

        let mut sorted = self.distances.clone();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let rank = f64::from(p) / 100.0 * (n + 1) as f64;
        let k = rank.floor() as usize;

        let value = if k == 0 {
            sorted[0]
        } else if k >= n {
            sorted[n - 1]
        } else {
            let (lo, hi) = (sorted[k - 1], sorted[k]);
            (rank - k as f64).mul_add(hi - lo, lo)
        };
        Ok(Some(value))
    }
}

/// Compute the distance field of `subject` against `reference`.
///
/// Uses default [`DistanceParams`] and no point mask. See
/// [`compute_distance_field_with_params`].
///
/// # Errors
///
/// Returns an error if the reference mesh has a cell referencing a missing
/// point.
pub fn compute_distance_field(
    subject: &IndexedMesh,
    reference: &IndexedMesh,
) -> DistanceResult<DistanceField> {
    compute_distance_field_with_params(subject, reference, None, &DistanceParams::default())
}

/// Compute the distance field of `subject` against `reference`.
///
/// For every subject point the unsigned distance to the nearest point on any
/// reference triangle is recorded. Points cleared in `mask` get distance 0
/// and are their own closest point.
///
/// An empty subject (no points) or a reference without cells yields an empty
/// field rather than an error.
///
/// # Errors
///
/// Returns an error if the parameters are invalid, the mask length does not
/// match the subject point count, or the reference mesh has a cell
/// referencing a missing point.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_distance::{DistanceParams, PointMask, compute_distance_field_with_params};
///
/// let subject = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 4.0);
/// let reference = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
/// let mask = PointMask::from_vec(vec![true, true, false, true]);
///
/// let field = compute_distance_field_with_params(
///     &subject,
///     &reference,
///     Some(&mask),
///     &DistanceParams::default(),
/// )
/// .unwrap();
///
/// assert_eq!(field.distance(0), Some(4.0));
/// assert_eq!(field.distance(2), Some(0.0));
/// ```
pub fn compute_distance_field_with_params(
    subject: &IndexedMesh,
    reference: &IndexedMesh,
    mask: Option<&PointMask>,
    params: &DistanceParams,
) -> DistanceResult<DistanceField> {
    params.validate()?;
    if let Some(mask) = mask {
        mask.check_len(subject)?;
    }

    if subject.vertex_count() == 0 || reference.face_count() == 0 {
        warn!(
            subject_vertices = subject.vertex_count(),
            reference_faces = reference.face_count(),
            "Degenerate input, returning empty distance field"
        );
        return Ok(DistanceField::empty());
    }

    info!(
        subject_vertices = subject.vertex_count(),
        reference_faces = reference.face_count(),
        "Computing surface distance field"
    );

    let bvh = TriangleBvh::build(reference, params.max_leaf_size)?;
    debug!(triangles = bvh.triangle_count(), "Reference BVH built");

    let mut distances = Vec::with_capacity(subject.vertex_count());
    let mut closest = Vec::with_capacity(subject.vertex_count());
    let mut masked = 0_usize;

    for (index, vertex) in subject.vertices.iter().enumerate() {
        let p = vertex.position;
        if mask.is_some_and(|m| !m.is_set(index)) {
            masked += 1;
            distances.push(0.0);
            closest.push(p);
            continue;
        }
        match bvh.nearest(&p) {
            Some(hit) => {
                distances.push(hit.distance());
                closest.push(hit.point);
            }
            None => {
                distances.push(0.0);
                closest.push(p);
            }
        }
    }

    let field = DistanceField { distances, closest };

    info!(
        points = field.len(),
        masked,
        max_distance = field.max_distance().unwrap_or(0.0),
        "Distance field complete"
    );

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::Vertex;

    #[test]
    fn parallel_planes() {
        let subject = IndexedMesh::planar_grid(5, 5, 1.0, [0.0, 0.0], 3.0);
        let reference = IndexedMesh::planar_grid(5, 5, 1.0, [0.0, 0.0], 0.0);
        let field = compute_distance_field(&subject, &reference).unwrap();

        assert_eq!(field.len(), 25);
        for i in 0..25 {
            assert_relative_eq!(field.distance(i).unwrap(), 3.0, epsilon = 1e-12);
            let q = field.closest_point(i).unwrap();
            assert_relative_eq!(q.z, 0.0);
        }
    }

    #[test]
    fn distance_is_one_way() {
        // Small reference patch under a large subject: subject corners are
        // far away, but every reference point is close to the subject.
        let subject = IndexedMesh::planar_grid(11, 11, 1.0, [0.0, 0.0], 1.0);
        let reference = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);

        let forward = compute_distance_field(&subject, &reference).unwrap();
        let backward = compute_distance_field(&reference, &subject).unwrap();

        assert!(forward.max_distance().unwrap() > 10.0);
        assert_relative_eq!(backward.max_distance().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_inputs_give_empty_field() {
        let grid = IndexedMesh::planar_grid(3, 3, 1.0, [0.0, 0.0], 0.0);
        assert!(compute_distance_field(&IndexedMesh::new(), &grid).unwrap().is_empty());
        assert!(compute_distance_field(&grid, &IndexedMesh::new()).unwrap().is_empty());

        let mut points_only = IndexedMesh::new();
        points_only.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(compute_distance_field(&grid, &points_only).unwrap().is_empty());
    }

    #[test]
    fn invalid_reference_face_is_an_error() {
        let subject = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 1.0);
        let mut reference = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
        reference.faces.push([0, 1, 42]);
        let err = compute_distance_field(&subject, &reference).unwrap_err();
        assert!(matches!(err, DistanceError::InvalidFace { vertex: 42, .. }));
    }

    #[test]
    fn degenerate_reference_cells_keep_distances_finite() {
        let mut reference = IndexedMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            reference.vertices.push(Vertex::from_coords(x, y, 0.0));
        }
        reference.faces.push([0, 0, 1]);
        reference.faces.push([1, 3, 2]);

        let mut subject = IndexedMesh::new();
        subject.vertices.push(Vertex::from_coords(0.5, 0.0, 2.0));
        subject.vertices.push(Vertex::from_coords(0.8, 0.8, 3.0));

        let field = compute_distance_field(&subject, &reference).unwrap();
        assert!(field.distances().iter().all(|d| d.is_finite()));
        assert_relative_eq!(field.distance(0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(field.distance(1).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn mask_length_mismatch() {
        let subject = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 1.0);
        let reference = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
        let mask = PointMask::all(3);
        let result = compute_distance_field_with_params(
            &subject,
            &reference,
            Some(&mask),
            &DistanceParams::default(),
        );
        assert!(matches!(result, Err(DistanceError::LengthMismatch { .. })));
    }

    #[test]
    fn percentile_edges() {
        let field = DistanceField::from_distances(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(field.percentile(0).unwrap(), Some(1.0));
        assert_eq!(field.percentile(100).unwrap(), Some(4.0));
        assert_eq!(field.percentile(10).unwrap(), Some(1.0));
        assert!(field.percentile(101).is_err());
        assert_eq!(DistanceField::empty().percentile(50).unwrap(), None);
    }
}
