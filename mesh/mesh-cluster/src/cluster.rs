//! Breadth-first connectivity clustering.

use std::collections::VecDeque;

use mesh_types::{IndexedMesh, MeshTopology, Point3, VertexAdjacency};
use tracing::{debug, info, warn};

use crate::{Cluster, ClusterError, ClusterMap, ClusterParams, ClusterResult};

/// Partition the active points of `mesh` into connected clusters.
///
/// `distances` holds one value per mesh point. Points whose value lies in
/// `[params.min_distance, params.max_distance]` are active; active points
/// sharing a cell are connected. Inactive points are left unassigned.
///
/// Each cluster's area sums the cells whose three points all belong to it.
/// Points that are not part of any cell still form singleton clusters when
/// active.
///
/// # Errors
///
/// Returns an error if the parameters are invalid, the field length does
/// not match the point count, or a cell references a missing point.
///
/// # Example
///
/// ```
/// use mesh_types::IndexedMesh;
/// use mesh_cluster::{cluster_by_distance, ClusterParams};
///
/// // 5x2 strip; the middle column is below the range and splits it
/// let mesh = IndexedMesh::planar_grid(5, 2, 1.0, [0.0, 0.0], 0.0);
/// let distances = vec![6.0, 6.0, 0.0, 8.0, 8.0, 6.0, 6.0, 0.0, 8.0, 8.0];
///
/// let map = cluster_by_distance(&mesh, &distances, &ClusterParams::new(5.0, 10.0)).unwrap();
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.label(2), None);
/// assert_eq!(map.label(0), Some(0));
/// assert_eq!(map.label(9), Some(1));
/// ```
pub fn cluster_by_distance(
    mesh: &IndexedMesh,
    distances: &[f64],
    params: &ClusterParams,
) -> ClusterResult<ClusterMap> {
    params.validate()?;

    let n = mesh.vertex_count();
    if distances.len() != n {
        return Err(ClusterError::FieldLengthMismatch {
            expected: n,
            actual: distances.len(),
        });
    }
    if let Some(bad) = mesh.first_invalid_face() {
        return Err(ClusterError::InvalidFace {
            face: bad.face,
            vertex: bad.vertex,
            vertex_count: n,
        });
    }
    if n == 0 {
        warn!("Mesh has no vertices, nothing to cluster");
        return Ok(ClusterMap::empty(0));
    }

    info!(
        vertices = n,
        faces = mesh.face_count(),
        min_distance = params.min_distance,
        max_distance = params.max_distance,
        "Clustering points by distance"
    );

    let adjacency = VertexAdjacency::from_mesh(mesh);
    let mut labels: Vec<Option<u32>> = vec![None; n];
    let mut members: Vec<Vec<u32>> = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if labels[seed].is_some() || !params.is_active(distances[seed]) {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = members.len() as u32;
        let mut points = Vec::new();

        labels[seed] = Some(id);
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            #[allow(clippy::cast_possible_truncation)]
            points.push(current as u32);
            for &neighbor in adjacency.neighbors(current) {
                let neighbor = neighbor as usize;
                if labels[neighbor].is_none() && params.is_active(distances[neighbor]) {
                    labels[neighbor] = Some(id);
                    queue.push_back(neighbor);
                }
            }
        }

        points.sort_unstable();
        members.push(points);
    }

    // Cells fully inside one cluster contribute to its area
    let mut face_counts = vec![0_usize; members.len()];
    let mut areas = vec![0.0_f64; members.len()];
    for (face_index, face) in mesh.faces.iter().enumerate() {
        let label = labels[face[0] as usize];
        if let Some(id) = label {
            if labels[face[1] as usize] == label && labels[face[2] as usize] == label {
                face_counts[id as usize] += 1;
                areas[id as usize] += mesh.face_area(face_index);
            }
        }
    }

    let clusters: Vec<Cluster> = members
        .into_iter()
        .zip(face_counts)
        .zip(areas)
        .enumerate()
        .map(|(id, ((points, face_count), area))| {
            #[allow(clippy::cast_possible_truncation)]
            let id = id as u32;
            summarize(mesh, distances, id, points, face_count, area)
        })
        .collect();

    for cluster in &clusters {
        debug!(
            cluster = cluster.id,
            size = cluster.size(),
            area = cluster.area,
            max_distance = cluster.max_distance,
            "Cluster found"
        );
    }

    let map = ClusterMap { clusters, labels };

    info!(
        clusters = map.len(),
        assigned = map.assigned_count(),
        "Clustering complete"
    );

    Ok(map)
}

#[allow(clippy::cast_precision_loss)]
fn summarize(
    mesh: &IndexedMesh,
    distances: &[f64],
    id: u32,
    points: Vec<u32>,
    face_count: usize,
    area: f64,
) -> Cluster {
    let mut max_distance_point = points[0];
    let mut max_distance = distances[points[0] as usize];
    let mut sum = Point3::origin().coords;
    let mut total = 0.0;

    for &p in &points {
        let d = distances[p as usize];
        if d > max_distance {
            max_distance = d;
            max_distance_point = p;
        }
        total += d;
        sum += mesh.vertices[p as usize].position.coords;
    }

    let count = points.len() as f64;
    Cluster {
        id,
        points,
        face_count,
        area,
        max_distance_point,
        max_distance,
        centroid: Point3::from(sum / count),
        mean_distance: total / count,
    }
}
