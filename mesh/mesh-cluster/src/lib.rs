//! Connectivity clustering of surface points by distance range.
//!
//! A point is *active* when its scalar value (typically the distance to a
//! reference surface) lies in `[min_distance, max_distance]`. Two active
//! points are connected when they share a triangle cell. Connectivity never
//! flows through inactive points. Every maximal connected set of active
//! points becomes a [`Cluster`].
//!
//! # Determinism
//!
//! Clusters are discovered by breadth-first search seeded from active points
//! in ascending point index, so ids `0..K` are stable for a fixed mesh and
//! field.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_cluster::{cluster_by_distance, ClusterParams};
//!
//! let mesh = IndexedMesh::planar_grid(4, 4, 1.0, [0.0, 0.0], 0.0);
//! let distances = vec![6.0; 16];
//!
//! let params = ClusterParams::new(5.0, 10.0);
//! let map = cluster_by_distance(&mesh, &distances, &params).unwrap();
//!
//! assert_eq!(map.len(), 1);
//! assert_eq!(map.clusters()[0].size(), 16);
//! assert!((map.clusters()[0].area - 9.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cluster;
mod error;
mod params;
mod result;

pub use cluster::cluster_by_distance;
pub use error::{ClusterError, ClusterResult};
pub use params::ClusterParams;
pub use result::{Cluster, ClusterMap};
