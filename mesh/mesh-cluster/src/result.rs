//! Result types for connectivity clustering.

use mesh_types::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A maximal connected set of active points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Region id, `0..K` in discovery order.
    pub id: u32,
    /// Member point indices in ascending order.
    pub points: Vec<u32>,
    /// Number of cells whose three points all belong to this cluster.
    pub face_count: usize,
    /// Total area of those fully-enclosed cells.
    pub area: f64,
    /// Member point with the largest distance (lowest index on ties).
    pub max_distance_point: u32,
    /// Distance of `max_distance_point`.
    pub max_distance: f64,
    /// Mean position of the member points.
    pub centroid: Point3<f64>,
    /// Mean distance of the member points.
    pub mean_distance: f64,
}

impl Cluster {
    /// Number of member points.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Whether point `index` belongs to this cluster.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.points.binary_search(&index).is_ok()
    }
}

/// Clusters of one invocation plus the per-point assignment.
///
/// # Example
///
/// ```
/// use mesh_cluster::ClusterMap;
///
/// let map = ClusterMap::empty(4);
/// assert!(map.is_empty());
/// assert_eq!(map.label(2), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterMap {
    pub(crate) clusters: Vec<Cluster>,
    pub(crate) labels: Vec<Option<u32>>,
}

impl ClusterMap {
    /// A map over `point_count` points with no clusters.
    #[must_use]
    pub fn empty(point_count: usize) -> Self {
        Self {
            clusters: Vec::new(),
            labels: vec![None; point_count],
        }
    }

    /// Number of clusters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True when no clusters were found.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Clusters in id order.
    #[inline]
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Consume the map, keeping only the clusters.
    #[must_use]
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// Cluster id of point `index`, or `None` if inactive or unknown.
    #[inline]
    #[must_use]
    pub fn label(&self, index: usize) -> Option<u32> {
        self.labels.get(index).copied().flatten()
    }

    /// Per-point cluster ids.
    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[Option<u32>] {
        &self.labels
    }

    /// Number of points assigned to any cluster.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }
}
