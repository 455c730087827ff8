// src/lib.rs
//! WireMesh
//!
//! An interactive wire-mesh scene viewer built on wgpu and winit: a scene
//! graph with bounding spheres, frustum culling, a free-fly camera rig, a
//! trackball and per-object projection-view-world matrices.

pub mod app;
pub mod config;
pub mod environment;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::WireMeshApp;
pub use config::{SceneLayout, ViewerConfig};
pub use error::SetupError;
pub use viewer::WireMeshViewer;

/// Creates a viewer application with the default configuration.
pub fn default() -> anyhow::Result<WireMeshApp> {
    WireMeshApp::new(ViewerConfig::default())
}
