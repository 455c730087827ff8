//! # Scene Management Module
//!
//! Scene hierarchy, bounding volumes, frustum culling and the vertex format.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - arena of group and visual nodes with derived world data
//! - [`BoundingSphere`] - bounds used for culling
//! - [`Culler`] - computes the visible set for a camera
//! - [`WireVertex`] - GPU vertex with barycentric corner coordinates
//!
//! ## Usage
//!
//! ```rust
//! use wiremesh::gfx::scene::SceneGraph;
//!
//! let mut scene = SceneGraph::new();
//! let group = scene.add_group(scene.root(), "row");
//! scene.local_transform_mut(group).unwrap().set_translation(0.0, 0.0, 10.0);
//! scene.update();
//! assert_eq!(scene.visuals().count(), 0);
//! ```

pub mod bound;
pub mod culler;
pub mod node;
pub mod vertex;

// Re-export main types
pub use bound::{BoundingSphere, Plane};
pub use culler::Culler;
pub use node::{GroupId, NodeId, NodeKind, SceneGraph, Transform, Visual};
pub use vertex::WireVertex;
