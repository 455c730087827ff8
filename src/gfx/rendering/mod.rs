// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The [`GraphicsEngine`] seam and its wgpu implementation.

pub mod engine;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use engine::{GraphicsEngine, MeshId, ProgramId};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
