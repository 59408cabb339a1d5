//! Point-to-surface distance fields.
//!
//! For every point of a *subject* surface this crate computes the unsigned
//! Euclidean distance to the nearest point on a *reference* surface. The
//! direction is one-way: only subject to reference distances are computed.
//!
//! Nearest-surface queries go through a triangle [`bvh::TriangleBvh`], so a
//! field over `n` points against `m` reference triangles costs roughly
//! `O(n log m)`.
//!
//! Optional [`PointMask`]s restrict the computation to a subset of subject
//! points; masked-out points get distance 0.
//!
//! # Layer 0 Crate
//!
//! Pure computation over immutable inputs. No I/O, no global state.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_distance::compute_distance_field;
//!
//! let subject = IndexedMesh::planar_grid(3, 3, 1.0, [0.0, 0.0], 2.5);
//! let reference = IndexedMesh::planar_grid(3, 3, 1.0, [0.0, 0.0], 0.0);
//!
//! let field = compute_distance_field(&subject, &reference).unwrap();
//! assert_eq!(field.len(), 9);
//! assert!((field.max_distance().unwrap() - 2.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod bvh;
mod error;
mod field;
mod mask;
mod params;

pub use error::{DistanceError, DistanceResult};
pub use field::{DistanceField, compute_distance_field, compute_distance_field_with_params};
pub use mask::{PointMask, erode_mask};
pub use params::DistanceParams;
