//! Point adjacency derived from triangle cells.

use crate::IndexedMesh;

/// For each point, the sorted list of points it shares a cell with.
///
/// Built once per mesh. Cell entries pointing outside the point array are
/// ignored.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, VertexAdjacency};
///
/// let grid = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
/// let adjacency = VertexAdjacency::from_mesh(&grid);
///
/// // Point 0 lies on both triangles of the quad
/// assert_eq!(adjacency.neighbors(0), &[1, 2, 3]);
/// // Point 1 only on the first
/// assert_eq!(adjacency.neighbors(1), &[0, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexAdjacency {
    neighbors: Vec<Vec<u32>>,
}

impl VertexAdjacency {
    /// Build adjacency for every point of `mesh`.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        let n = mesh.vertices.len();
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); n];

        for face in &mesh.faces {
            if face.iter().any(|&v| v as usize >= n) {
                continue;
            }
            for (k, &v) in face.iter().enumerate() {
                let list = &mut neighbors[v as usize];
                list.push(face[(k + 1) % 3]);
                list.push(face[(k + 2) % 3]);
            }
        }

        for (v, list) in neighbors.iter_mut().enumerate() {
            list.sort_unstable();
            list.dedup();
            // Degenerate cells can list a point as its own neighbor
            list.retain(|&u| u as usize != v);
        }

        Self { neighbors }
    }

    /// Number of points covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// True when built from a mesh without points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of point `index`; empty for unknown or isolated points.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, index: usize) -> &[u32] {
        self.neighbors.get(index).map_or(&[], Vec::as_slice)
    }
}
