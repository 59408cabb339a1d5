//! Patch selection: filter and rank clusters, pick one point per patch.

use mesh_cluster::Cluster;
use mesh_distance::DistanceField;
use mesh_types::{IndexedMesh, Point3};
use tracing::{debug, info};

use crate::{Candidate, CandidateSource, RepresentativePoint};

/// Filters clusters into distant surface patches.
///
/// A cluster survives when all three hold, each strictly:
///
/// - its point count exceeds `min_patch_size`
/// - its largest distance exceeds `min_distance`
/// - the area of its fully enclosed cells exceeds `min_patch_area`
///
/// Survivors are ranked by descending area; equal areas keep their input
/// order.
///
/// # Example
///
/// ```
/// use mesh_cluster::{cluster_by_distance, ClusterParams};
/// use mesh_types::IndexedMesh;
/// use roi_select::PatchSelector;
///
/// let mesh = IndexedMesh::planar_grid(4, 4, 1.0, [0.0, 0.0], 0.0);
/// let mut distances = vec![2.0; 16];
/// distances[5] = 3.0;
///
/// let map = cluster_by_distance(&mesh, &distances, &ClusterParams::new(1.0, 10.0)).unwrap();
/// let selector = PatchSelector::new(10, 0.0, 1.0);
///
/// let patches = selector.select(map.clusters());
/// assert_eq!(patches.len(), 1);
/// assert_eq!(patches[0].max_distance_point, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchSelector {
    min_patch_size: usize,
    min_patch_area: f64,
    min_distance: f64,
}

impl PatchSelector {
    /// Create a selector with the given exclusive lower bounds.
    #[must_use]
    pub const fn new(min_patch_size: usize, min_patch_area: f64, min_distance: f64) -> Self {
        Self {
            min_patch_size,
            min_patch_area,
            min_distance,
        }
    }

    /// Why a cluster is rejected, or `None` if it survives.
    fn rejection(&self, cluster: &Cluster) -> Option<&'static str> {
        if cluster.size() <= self.min_patch_size {
            Some("too few points")
        } else if cluster.max_distance <= self.min_distance {
            Some("not distant enough")
        } else if cluster.area <= self.min_patch_area {
            Some("too small an area")
        } else {
            None
        }
    }

    /// Surviving clusters ranked by descending area.
    #[must_use]
    pub fn select<'a>(&self, clusters: &'a [Cluster]) -> Vec<&'a Cluster> {
        let mut kept: Vec<&Cluster> = clusters
            .iter()
            .filter(|cluster| match self.rejection(cluster) {
                Some(reason) => {
                    debug!(
                        cluster = cluster.id,
                        size = cluster.size(),
                        area = cluster.area,
                        max_distance = cluster.max_distance,
                        reason,
                        "Patch rejected"
                    );
                    false
                }
                None => true,
            })
            .collect();

        kept.sort_by(|a, b| b.area.total_cmp(&a.area));

        info!(
            clusters = clusters.len(),
            patches = kept.len(),
            "Patch selection complete"
        );
        kept
    }

    /// Rank the clusters and turn each survivor into a candidate.
    ///
    /// `field` must be the distance field the clusters were built from;
    /// it supplies closest reference points for
    /// [`RepresentativePoint::Midpoint`].
    #[must_use]
    pub fn candidates(
        &self,
        mesh: &IndexedMesh,
        field: &DistanceField,
        clusters: &[Cluster],
        representative: RepresentativePoint,
    ) -> Vec<Candidate> {
        self.select(clusters)
            .into_iter()
            .filter_map(|cluster| {
                let position = representative_position(mesh, field, cluster, representative)?;
                Some(Candidate {
                    position,
                    source: CandidateSource::Patch {
                        cluster: cluster.id,
                        size: cluster.size(),
                        area: cluster.area,
                        max_distance: cluster.max_distance,
                    },
                })
            })
            .collect()
    }
}

fn representative_position(
    mesh: &IndexedMesh,
    field: &DistanceField,
    cluster: &Cluster,
    representative: RepresentativePoint,
) -> Option<Point3<f64>> {
    let seed = cluster.max_distance_point as usize;
    match representative {
        RepresentativePoint::MaxDistance => mesh.position(seed),
        RepresentativePoint::Centroid => Some(cluster.centroid),
        RepresentativePoint::Midpoint => {
            let p = mesh.position(seed)?;
            let q = field.closest_point(seed).unwrap_or(p);
            Some(midpoint(&p, &q))
        }
    }
}

fn midpoint(p: &Point3<f64>, q: &Point3<f64>) -> Point3<f64> {
    Point3::from((p.coords + q.coords) * 0.5)
}
