//! Traits for surface mesh access.

use crate::Triangle;

/// Read access to an indexed triangle surface.
///
/// Algorithms downstream only need points and triangle cells, so they are
/// written against this trait rather than a concrete mesh type.
pub trait MeshTopology {
    /// Number of points.
    fn vertex_count(&self) -> usize;

    /// Number of triangle cells.
    fn face_count(&self) -> usize;

    /// True when the surface has no points or no cells.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Resolve a cell to its vertex positions.
    ///
    /// Returns `None` if the face index, or any vertex index it holds, is
    /// out of range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;
}

