//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Compute the (unnormalized) face normal via cross product.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the area of the triangle.
    ///
    /// Degenerate (collinear) triangles have zero area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Compute the closest point on the triangle to a query point.
    ///
    /// Implements the Voronoi-region method from "Real-Time Collision
    /// Detection" (Ericson), which handles vertex, edge, and face regions
    /// without solving a linear system.
    ///
    /// Degenerate triangles (repeated or collinear vertices) are treated as
    /// the union of their edges, so the result is finite for finite input.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 0.0, 0.0),
    ///     Point3::new(0.0, 10.0, 0.0),
    /// );
    ///
    /// let q = tri.closest_point(&Point3::new(2.0, 2.0, 5.0));
    /// assert!((q - Point3::new(2.0, 2.0, 0.0)).norm() < 1e-10);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let p = *p;
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;

        let scale = ab.norm_squared().max(ac.norm_squared());
        if self.normal_unnormalized().norm_squared() <= f64::EPSILON * scale * scale {
            return self.closest_point_on_edges(&p);
        }

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1.mul_add(d4, -(d3 * d2));
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 && d1 - d3 > 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5.mul_add(d2, -(d1 * d6));
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 && d2 - d6 > 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3.mul_add(d6, -(d5 * d4));
        let (e4, e5) = (d4 - d3, d5 - d6);
        if va <= 0.0 && e4 >= 0.0 && e5 >= 0.0 && e4 + e5 > 0.0 {
            let w = e4 / (e4 + e5);
            return b + (c - b) * w;
        }

        let sum = va + vb + vc;
        if sum.abs() < f64::MIN_POSITIVE {
            return self.closest_point_on_edges(&p);
        }
        let denom = 1.0 / sum;
        a + ab * (vb * denom) + ac * (vc * denom)
    }

    /// Closest point on the three edges, used when the triangle has no area.
    fn closest_point_on_edges(&self, p: &Point3<f64>) -> Point3<f64> {
        [
            closest_point_on_segment(&self.v0, &self.v1, p),
            closest_point_on_segment(&self.v1, &self.v2, p),
            closest_point_on_segment(&self.v2, &self.v0, p),
        ]
        .into_iter()
        .min_by(|q, r| (*q - *p).norm_squared().total_cmp(&(*r - *p).norm_squared()))
        .unwrap_or(self.v0)
    }
}

fn closest_point_on_segment(a: &Point3<f64>, b: &Point3<f64>, p: &Point3<f64>) -> Point3<f64> {
    let ab = *b - *a;
    let len_sq = ab.norm_squared();
    if len_sq <= 0.0 {
        return *a;
    }
    let t = ((*p - *a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    *a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        )
    }

    #[test]
    fn triangle_area() {
        assert_relative_eq!(right_triangle().area(), 6.0);
    }

    #[test]
    fn degenerate_triangle_has_zero_area() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert_relative_eq!(tri.area(), 0.0);
    }

    #[test]
    fn closest_point_face_region() {
        let q = right_triangle().closest_point(&Point3::new(1.0, 1.0, -7.0));
        assert_relative_eq!(q.x, 1.0);
        assert_relative_eq!(q.y, 1.0);
        assert_relative_eq!(q.z, 0.0);
    }

    #[test]
    fn closest_point_vertex_region() {
        let q = right_triangle().closest_point(&Point3::new(-2.0, -2.0, 1.0));
        assert_eq!(q, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn closest_point_edge_region() {
        // Below the x-axis edge
        let q = right_triangle().closest_point(&Point3::new(1.5, -3.0, 0.0));
        assert_relative_eq!(q.x, 1.5);
        assert_relative_eq!(q.y, 0.0);
    }

    #[test]
    fn repeated_vertex_behaves_like_a_segment() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        let q = tri.closest_point(&Point3::new(0.5, 0.0, 2.0));
        assert_relative_eq!(q.x, 0.5);
        assert_relative_eq!(q.y, 0.0);
        assert_relative_eq!(q.z, 0.0);

        let q = tri.closest_point(&Point3::new(3.0, 1.0, 0.0));
        assert_eq!(q, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn collapsed_triangle_is_its_vertex() {
        let p = Point3::new(2.0, -1.0, 4.0);
        let tri = Triangle::new(p, p, p);
        assert_eq!(tri.closest_point(&Point3::origin()), p);
    }

    #[test]
    fn collinear_vertices_stay_finite() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        let q = tri.closest_point(&Point3::new(1.5, 3.0, 0.0));
        assert_relative_eq!(q.x, 1.5);
        assert_relative_eq!(q.y, 0.0);
    }
}
