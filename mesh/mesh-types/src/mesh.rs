//! Indexed triangle surface.

use crate::{MeshTopology, Triangle, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle surface.
///
/// Points and triangle cells are stored separately; cells reference points
/// by index. Per-point scalars computed by other crates (distances, cluster
/// labels, masks) are parallel arrays indexed the same way as `vertices`.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Point data.
    pub vertices: Vec<Vertex>,

    /// Triangle cells as indices into the point array.
    pub faces: Vec<[u32; 3]>,
}

/// A cell that references a point index outside the point array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFace {
    /// Index of the offending cell.
    pub face: usize,
    /// The out-of-range vertex index.
    pub vertex: u32,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let mesh = IndexedMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Build a flat rectangular grid in the plane `z = height`.
    ///
    /// The grid has `nx * ny` points spaced `spacing` apart starting at
    /// `(x0, y0)`, split into two triangles per quad. Point `(i, j)` has
    /// index `j * nx + i`. Fewer than two points along either axis yields
    /// points but no cells.
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let grid = IndexedMesh::planar_grid(4, 3, 1.0, [0.0, 0.0], 0.0);
    /// assert_eq!(grid.vertex_count(), 12);
    /// assert_eq!(grid.face_count(), 2 * 3 * 2);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn planar_grid(nx: usize, ny: usize, spacing: f64, origin: [f64; 2], height: f64) -> Self {
        let cells = nx.saturating_sub(1) * ny.saturating_sub(1) * 2;
        let mut mesh = Self::with_capacity(nx * ny, cells);

        for j in 0..ny {
            for i in 0..nx {
                mesh.vertices.push(Vertex::from_coords(
                    (i as f64).mul_add(spacing, origin[0]),
                    (j as f64).mul_add(spacing, origin[1]),
                    height,
                ));
            }
        }

        for j in 0..ny.saturating_sub(1) {
            for i in 0..nx.saturating_sub(1) {
                let a = (j * nx + i) as u32;
                let b = a + 1;
                let c = a + nx as u32;
                let d = c + 1;
                mesh.faces.push([a, b, d]);
                mesh.faces.push([a, d, c]);
            }
        }

        mesh
    }

    /// Position of point `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Option<nalgebra::Point3<f64>> {
        self.vertices.get(index).map(|v| v.position)
    }

    /// Find the first cell referencing a point outside the point array.
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, InvalidFace, Vertex};
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    /// mesh.faces.push([0, 0, 5]);
    ///
    /// assert_eq!(mesh.first_invalid_face(), Some(InvalidFace { face: 0, vertex: 5 }));
    /// ```
    #[must_use]
    pub fn first_invalid_face(&self) -> Option<InvalidFace> {
        let n = self.vertices.len();
        self.faces.iter().enumerate().find_map(|(face, tri)| {
            tri.iter()
                .find(|&&v| v as usize >= n)
                .map(|&vertex| InvalidFace { face, vertex })
        })
    }

    /// Area of a single cell, or 0.0 if it cannot be resolved.
    #[must_use]
    pub fn face_area(&self, face_index: usize) -> f64 {
        self.triangle(face_index).map_or(0.0, |t| t.area())
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle::new(
            self.vertices.get(i0 as usize)?.position,
            self.vertices.get(i1 as usize)?.position,
            self.vertices.get(i2 as usize)?.position,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn planar_grid_layout() {
        let grid = IndexedMesh::planar_grid(3, 2, 2.0, [10.0, -1.0], 5.0);
        assert_eq!(grid.vertex_count(), 6);
        assert_eq!(grid.face_count(), 4);
        let p = grid.position(4).unwrap();
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 1.0);
        assert_relative_eq!(p.z, 5.0);
        assert!(grid.first_invalid_face().is_none());
    }

    #[test]
    fn planar_grid_area() {
        let grid = IndexedMesh::planar_grid(5, 5, 1.0, [0.0, 0.0], 0.0);
        let total: f64 = (0..grid.face_count()).map(|f| grid.face_area(f)).sum();
        assert_relative_eq!(total, 16.0, epsilon = 1e-12);
    }

    #[test]
    fn single_row_has_no_cells() {
        let grid = IndexedMesh::planar_grid(5, 1, 1.0, [0.0, 0.0], 0.0);
        assert_eq!(grid.vertex_count(), 5);
        assert_eq!(grid.face_count(), 0);
    }

    #[test]
    fn out_of_range_face_resolves_to_none() {
        let mut mesh = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
        mesh.faces.push([0, 1, 9]);
        assert!(mesh.triangle(2).is_none());
        assert_relative_eq!(mesh.face_area(2), 0.0);
        assert_eq!(
            mesh.first_invalid_face(),
            Some(InvalidFace { face: 2, vertex: 9 })
        );
    }
}
