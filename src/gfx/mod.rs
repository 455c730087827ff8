//! # Graphics Module
//!
//! Camera models, scene management, procedural geometry, shader constants
//! and the rendering backend.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - camera frame and frustum, free-fly rig, trackball
//! - **Scene Management** ([`scene`]) - node arena, bounds and frustum culling
//! - **Geometry** ([`geometry`]) - sphere, torus and octahedron generation
//! - **Resource Management** ([`resources`]) - constant buffers and PVW matrices
//! - **Rendering** ([`rendering`]) - the [`GraphicsEngine`] seam and its wgpu implementation
//!
//! [`GraphicsEngine`]: rendering::GraphicsEngine

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, CameraRig, Trackball};
pub use rendering::{GraphicsEngine, RenderEngine};
