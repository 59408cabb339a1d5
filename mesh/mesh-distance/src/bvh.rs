//! Bounding volume hierarchy for nearest-surface queries.
//!
//! Built once per reference mesh; answers "closest point on the surface"
//! queries in roughly logarithmic time by pruning subtrees whose box is
//! farther away than the best hit found so far.

use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Triangle};
use smallvec::SmallVec;

use crate::{DistanceError, DistanceResult};

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Bounding box of all triangles in this leaf.
        bbox: Aabb,
        /// Triangle indices stored in this leaf.
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all triangles in this subtree.
        bbox: Aabb,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Get the bounding box of this node.
    #[must_use]
    pub const fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Closest surface point found by a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    /// Index of the reference triangle holding the closest point.
    pub face: u32,
    /// Closest point on the reference surface.
    pub point: Point3<f64>,
    /// Squared Euclidean distance from the query to `point`.
    pub distance_squared: f64,
}

impl NearestHit {
    /// Euclidean distance from the query to the hit.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}

/// Bounding volume hierarchy over the triangles of one mesh.
#[derive(Debug)]
pub struct TriangleBvh {
    root: Option<BvhNode>,
    triangles: Vec<Triangle>,
}

impl TriangleBvh {
    /// Build a BVH over all cells of `mesh`.
    ///
    /// A mesh without cells yields an empty BVH whose queries return `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::InvalidFace`] if a cell references a point
    /// outside the point array.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Point3};
    /// use mesh_distance::bvh::TriangleBvh;
    ///
    /// let mesh = IndexedMesh::planar_grid(4, 4, 1.0, [0.0, 0.0], 0.0);
    /// let bvh = TriangleBvh::build(&mesh, 4).unwrap();
    /// assert_eq!(bvh.triangle_count(), 18);
    ///
    /// let hit = bvh.nearest(&Point3::new(1.5, 1.5, 3.0)).unwrap();
    /// assert!((hit.distance() - 3.0).abs() < 1e-12);
    /// ```
    pub fn build(mesh: &IndexedMesh, max_leaf_size: usize) -> DistanceResult<Self> {
        if let Some(bad) = mesh.first_invalid_face() {
            return Err(DistanceError::InvalidFace {
                face: bad.face,
                vertex: bad.vertex,
                vertex_count: mesh.vertex_count(),
            });
        }

        let triangles: Vec<Triangle> = (0..mesh.face_count())
            .filter_map(|f| mesh.triangle(f))
            .collect();
        if triangles.is_empty() {
            return Ok(Self {
                root: None,
                triangles,
            });
        }

        let boxes: Vec<(u32, Aabb)> = triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                #[allow(clippy::cast_possible_truncation)]
                let index = i as u32;
                (index, Aabb::from_points([t.v0, t.v1, t.v2].iter()))
            })
            .collect();

        let indices: Vec<usize> = (0..boxes.len()).collect();
        let root = Self::build_recursive(&boxes, indices, max_leaf_size.max(1));

        Ok(Self {
            root: Some(root),
            triangles,
        })
    }

    fn build_recursive(boxes: &[(u32, Aabb)], indices: Vec<usize>, max_leaf_size: usize) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand_to_enclose(&boxes[i].1);
        }

        if indices.len() <= max_leaf_size {
            return BvhNode::Leaf {
                bbox,
                triangles: indices.iter().map(|&i| boxes[i].0).collect(),
            };
        }

        // Median split along the longest axis of the node box
        let axis = bbox.longest_axis();
        let mut sorted = indices;
        sorted.sort_by(|&a, &b| {
            let ca = boxes[a].1.center();
            let cb = boxes[b].1.center();
            ca[axis].total_cmp(&cb[axis])
        });

        let right_indices = sorted.split_off(sorted.len() / 2);
        let left = Self::build_recursive(boxes, sorted, max_leaf_size);
        let right = Self::build_recursive(boxes, right_indices, max_leaf_size);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of triangles indexed by the BVH.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the BVH holds no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Find the closest point on the indexed surface to `query`.
    ///
    /// Returns `None` for an empty BVH. Ties between equidistant triangles
    /// resolve to whichever is visited first, which is fixed for a given
    /// mesh.
    #[must_use]
    pub fn nearest(&self, query: &Point3<f64>) -> Option<NearestHit> {
        let root = self.root.as_ref()?;
        let mut best: Option<NearestHit> = None;
        let mut stack: Vec<&BvhNode> = vec![root];

        while let Some(node) = stack.pop() {
            let bound = best.map_or(f64::INFINITY, |b| b.distance_squared);
            if node.bbox().distance_squared_to(query) > bound {
                continue;
            }
            match node {
                BvhNode::Leaf { triangles, .. } => {
                    for &face in triangles {
                        let point = self.triangles[face as usize].closest_point(query);
                        let distance_squared = (point - query).norm_squared();
                        if !distance_squared.is_finite() {
                            continue;
                        }
                        if best.is_none_or(|b| distance_squared < b.distance_squared) {
                            best = Some(NearestHit {
                                face,
                                point,
                                distance_squared,
                            });
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    // Push the farther child first so the nearer one is popped next
                    let dl = left.bbox().distance_squared_to(query);
                    let dr = right.bbox().distance_squared_to(query);
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        best
    }
}
