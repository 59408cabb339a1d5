//! Core surface mesh types for ROI selection.
//!
//! This crate provides the data model shared by the distance, clustering,
//! and ROI selection crates:
//!
//! - [`Vertex`] - A surface point in 3D space
//! - [`IndexedMesh`] - A triangle surface with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box, including cubic ROI boxes
//! - [`VertexAdjacency`] - Which points share a cell
//!
//! # Layer 0 Crate
//!
//! This crate depends only on `nalgebra` (and optionally `serde`). Meshes are
//! plain data: points plus triangle cells, immutable for the duration of a
//! selection run. No file format is implied.
//!
//! # Units
//!
//! Coordinates are `f64` and unit-agnostic. Brain surfaces are usually
//! expressed in millimeters in scanner (world) space.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//!
//! // A 20mm cubic region of interest centered on the first vertex
//! let roi = Aabb::cube(mesh.vertices[0].position, 20.0);
//! assert!((roi.volume() - 8000.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use adjacency::VertexAdjacency;
pub use bounds::Aabb;
pub use mesh::{IndexedMesh, InvalidFace};
pub use traits::MeshTopology;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
