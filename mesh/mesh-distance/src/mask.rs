//! Per-point masks restricting which subject points are considered.

use mesh_types::{IndexedMesh, MeshTopology};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DistanceError, DistanceResult};

/// A boolean flag per mesh point; `true` means the point is considered.
///
/// # Example
///
/// ```
/// use mesh_distance::PointMask;
///
/// let mask = PointMask::from_vec(vec![true, false, true]);
/// assert_eq!(mask.len(), 3);
/// assert_eq!(mask.count_set(), 2);
/// assert!(!mask.is_set(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointMask {
    flags: Vec<bool>,
}

impl PointMask {
    /// A mask with every one of `len` points set.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self {
            flags: vec![true; len],
        }
    }

    /// Wrap an existing flag vector.
    #[must_use]
    pub const fn from_vec(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Convert a per-cell mask to a per-point mask.
    ///
    /// A point is set if any cell it belongs to is set.
    ///
    /// # Errors
    ///
    /// Returns an error if `face_mask` does not have one entry per cell or
    /// a cell references a point outside the mesh.
    pub fn from_face_mask(mesh: &IndexedMesh, face_mask: &[bool]) -> DistanceResult<Self> {
        if face_mask.len() != mesh.face_count() {
            return Err(DistanceError::length_mismatch(
                "face mask",
                mesh.face_count(),
                face_mask.len(),
            ));
        }
        check_faces(mesh)?;

        let mut flags = vec![false; mesh.vertex_count()];
        for (face, &set) in mesh.faces.iter().zip(face_mask) {
            if set {
                for &v in face {
                    flags[v as usize] = true;
                }
            }
        }
        Ok(Self { flags })
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True when the mask has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether point `index` is set. Out-of-range indices are unset.
    #[inline]
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of set points.
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Borrow the raw flags.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    pub(crate) fn check_len(&self, mesh: &IndexedMesh) -> DistanceResult<()> {
        if self.flags.len() == mesh.vertex_count() {
            Ok(())
        } else {
            Err(DistanceError::length_mismatch(
                "point mask",
                mesh.vertex_count(),
                self.flags.len(),
            ))
        }
    }
}

fn check_faces(mesh: &IndexedMesh) -> DistanceResult<()> {
    match mesh.first_invalid_face() {
        Some(bad) => Err(DistanceError::InvalidFace {
            face: bad.face,
            vertex: bad.vertex,
            vertex_count: mesh.vertex_count(),
        }),
        None => Ok(()),
    }
}

/// Shrink a point mask by clearing points near its boundary.
///
/// Each iteration clears every point that shares a cell with a point that
/// was cleared before the iteration started. Points outside every cell keep
/// their value. Zero iterations return the mask unchanged.
///
/// # Errors
///
/// Returns an error if the mask length does not match the mesh point count
/// or a cell references a point outside the mesh.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_distance::{PointMask, erode_mask};
///
/// // 5x1 strip of quads; clear the left column
/// let mesh = IndexedMesh::planar_grid(5, 2, 1.0, [0.0, 0.0], 0.0);
/// let flags = (0..10).map(|i| i % 5 != 0).collect();
/// let mask = PointMask::from_vec(flags);
///
/// let eroded = erode_mask(&mesh, &mask, 1).unwrap();
/// assert!(!eroded.is_set(1));
/// assert!(eroded.is_set(2));
/// ```
pub fn erode_mask(
    mesh: &IndexedMesh,
    mask: &PointMask,
    iterations: usize,
) -> DistanceResult<PointMask> {
    mask.check_len(mesh)?;
    check_faces(mesh)?;

    let mut current = mask.flags.clone();
    for _ in 0..iterations {
        let mut next = current.clone();
        for face in &mesh.faces {
            if face.iter().any(|&v| !current[v as usize]) {
                for &v in face {
                    next[v as usize] = false;
                }
            }
        }
        if next == current {
            break;
        }
        current = next;
    }

    Ok(PointMask { flags: current })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_mask_to_point_mask() {
        let mesh = IndexedMesh::planar_grid(3, 2, 1.0, [0.0, 0.0], 0.0);
        // Faces 0,1 cover the left quad, faces 2,3 the right quad
        let mask = PointMask::from_face_mask(&mesh, &[true, true, false, false]).unwrap();
        assert_eq!(mask.as_slice(), &[true, true, false, true, true, false]);
    }

    #[test]
    fn face_mask_length_checked() {
        let mesh = IndexedMesh::planar_grid(3, 2, 1.0, [0.0, 0.0], 0.0);
        let err = PointMask::from_face_mask(&mesh, &[true]).unwrap_err();
        assert!(matches!(err, DistanceError::LengthMismatch { expected: 4, actual: 1, .. }));
    }

    #[test]
    fn erosion_advances_one_ring_per_iteration() {
        let mesh = IndexedMesh::planar_grid(6, 2, 1.0, [0.0, 0.0], 0.0);
        let flags = (0..12).map(|i| i % 6 != 0).collect();
        let mask = PointMask::from_vec(flags);

        let once = erode_mask(&mesh, &mask, 1).unwrap();
        assert_eq!(once.count_set(), 8);

        let twice = erode_mask(&mesh, &mask, 2).unwrap();
        assert_eq!(twice.count_set(), 6);
        assert!(!twice.is_set(2));
        assert!(twice.is_set(3));
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mesh = IndexedMesh::planar_grid(3, 3, 1.0, [0.0, 0.0], 0.0);
        let mask = PointMask::from_vec(vec![true, false, true, true, true, true, true, true, true]);
        assert_eq!(erode_mask(&mesh, &mask, 0).unwrap(), mask);
    }

    #[test]
    fn full_mask_is_stable() {
        let mesh = IndexedMesh::planar_grid(4, 4, 1.0, [0.0, 0.0], 0.0);
        let mask = PointMask::all(16);
        assert_eq!(erode_mask(&mesh, &mask, 5).unwrap().count_set(), 16);
    }

    #[test]
    fn mask_length_checked() {
        let mesh = IndexedMesh::planar_grid(2, 2, 1.0, [0.0, 0.0], 0.0);
        assert!(erode_mask(&mesh, &PointMask::all(3), 1).is_err());
    }
}
