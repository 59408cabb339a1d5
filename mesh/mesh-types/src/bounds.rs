//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Used both for spatial acceleration (BVH nodes, sampling strata) and as
/// the extent of a cubic region of interest.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::cube(Point3::new(5.0, 5.0, 5.0), 10.0);
///
/// assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
/// assert!((aabb.volume() - 1000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create the cube of side `span` centered at `center`.
    ///
    /// A negative span is treated as zero, giving a degenerate box at the
    /// center point.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let roi = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 40.0);
    /// assert_eq!(roi.min, Point3::new(-20.0, -20.0, -20.0));
    /// assert_eq!(roi.max, Point3::new(20.0, 20.0, 20.0));
    /// ```
    #[must_use]
    pub fn cube(center: Point3<f64>, span: f64) -> Self {
        let r = (0.5 * span).max(0.0);
        let half = Vector3::new(r, r, r);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create an empty (inverted) AABB.
    ///
    /// An empty AABB has min > max, which makes it the identity for
    /// [`expand_to_include`](Self::expand_to_include).
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB enclosing all points of an iterator.
    ///
    /// Returns an empty AABB if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Check if the AABB is empty (min > max on any axis).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (dimensions) of the AABB.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the center of the AABB.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Get the volume of the AABB, or 0.0 if empty.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Check if this AABB intersects another. Touching boxes intersect.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    /// let b = Aabb::cube(Point3::new(2.0, 0.0, 0.0), 2.0);
    /// let c = Aabb::cube(Point3::new(5.0, 0.0, 0.0), 2.0);
    ///
    /// assert!(a.intersects(&b)); // shared face
    /// assert!(!a.intersects(&c));
    /// ```
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Volume of the intersection of two boxes.
    ///
    /// Each axis contributes `max(0, min(a.max, b.max) - max(a.min, b.min))`,
    /// so boxes that are disjoint or merely touching on any axis yield 0.
    #[must_use]
    pub fn intersection_volume(&self, other: &Self) -> f64 {
        let dx = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let dy = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        let dz = (self.max.z.min(other.max.z) - self.min.z.max(other.min.z)).max(0.0);
        dx * dy * dz
    }

    /// Volumetric overlap ratio (Jaccard index) of two boxes.
    ///
    /// Returns `intersection / (vol_a + vol_b - intersection)`: 0 for
    /// disjoint or touching boxes, 1 for identical boxes. The result is
    /// symmetric in its arguments.
    ///
    /// Returns `None` when the union volume is not positive (both boxes
    /// have zero volume), for which no meaningful ratio exists.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 2.0);
    /// let b = Aabb::cube(Point3::new(1.0, 0.0, 0.0), 2.0);
    ///
    /// // Intersection 1x2x2 = 4, union 8 + 8 - 4 = 12
    /// let ratio = a.overlap_ratio(&b).unwrap();
    /// assert!((ratio - 1.0 / 3.0).abs() < 1e-12);
    ///
    /// let point = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 0.0);
    /// assert!(point.overlap_ratio(&point).is_none());
    /// ```
    #[must_use]
    pub fn overlap_ratio(&self, other: &Self) -> Option<f64> {
        let intersection = self.intersection_volume(other);
        let union = self.volume() + other.volume() - intersection;
        if union > 0.0 {
            Some(intersection / union)
        } else {
            None
        }
    }

    /// Expand the AABB to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Expand the AABB to enclose another AABB.
    pub fn expand_to_enclose(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.expand_to_include(&other.min);
        self.expand_to_include(&other.max);
    }

    /// Squared distance from a point to the box (0 inside).
    ///
    /// Used as a lower bound when pruning nearest-surface searches.
    #[must_use]
    pub fn distance_squared_to(&self, point: &Point3<f64>) -> f64 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        let dz = (self.min.z - point.z).max(0.0).max(point.z - self.max.z);
        dz.mul_add(dz, dx.mul_add(dx, dy * dy))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aabb_cube_volume() {
        let roi = Aabb::cube(Point3::new(1.0, 2.0, 3.0), 20.0);
        assert_relative_eq!(roi.volume(), 8000.0);
        assert_eq!(roi.center(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn aabb_negative_span_is_point() {
        let roi = Aabb::cube(Point3::new(1.0, 1.0, 1.0), -4.0);
        assert_eq!(roi.min, roi.max);
        assert_eq!(roi.volume(), 0.0);
    }

    #[test]
    fn aabb_empty() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.volume(), 0.0);
    }

    #[test]
    fn aabb_from_points() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 3.0),
            Point3::new(-2.0, 8.0, 1.0),
        ];
        let aabb = Aabb::from_points(points.iter());
        assert_eq!(aabb.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(10.0, 8.0, 3.0));
        assert_eq!(aabb.longest_axis(), 0);
    }

    #[test]
    fn overlap_disjoint_is_zero() {
        let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 10.0);
        let b = Aabb::cube(Point3::new(100.0, 0.0, 0.0), 10.0);
        assert_eq!(a.overlap_ratio(&b).unwrap(), 0.0);
    }

    #[test]
    fn overlap_touching_is_zero() {
        let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 10.0);
        let b = Aabb::cube(Point3::new(10.0, 0.0, 0.0), 10.0);
        assert!(a.intersects(&b));
        assert_eq!(a.overlap_ratio(&b).unwrap(), 0.0);
    }

    #[test]
    fn overlap_identical_is_one() {
        let a = Aabb::cube(Point3::new(3.5, -1.25, 7.0), 20.0);
        assert_eq!(a.overlap_ratio(&a).unwrap(), 1.0);
    }

    #[test]
    fn overlap_nested_boxes() {
        // 20mm box at (5,5,5) fully inside a 40mm box at the origin
        let outer = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 40.0);
        let inner = Aabb::cube(Point3::new(5.0, 5.0, 5.0), 20.0);
        let ratio = outer.overlap_ratio(&inner).unwrap();
        assert_relative_eq!(ratio, 8000.0 / 64000.0);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 3.0);
        let b = Aabb::cube(Point3::new(1.5, -1.0, 2.0), 7.0);
        assert_eq!(a.overlap_ratio(&b), b.overlap_ratio(&a));
    }

    #[test]
    fn overlap_of_point_boxes_is_undefined() {
        let a = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 0.0);
        let b = Aabb::cube(Point3::new(1.0, 0.0, 0.0), 0.0);
        assert!(a.overlap_ratio(&b).is_none());
    }

    #[test]
    fn distance_to_box() {
        let aabb = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        assert_eq!(aabb.distance_squared_to(&Point3::new(0.5, 0.0, 0.0)), 0.0);
        assert_relative_eq!(aabb.distance_squared_to(&Point3::new(4.0, 0.0, 0.0)), 9.0);
        assert_relative_eq!(aabb.distance_squared_to(&Point3::new(2.0, 2.0, 0.0)), 2.0);
    }

    #[test]
    fn expand_to_enclose_ignores_empty() {
        let mut aabb = Aabb::cube(Point3::new(0.0, 0.0, 0.0), 2.0);
        let before = aabb;
        aabb.expand_to_enclose(&Aabb::empty());
        assert_eq!(aabb, before);
    }
}
