// src/gfx/resources/mod.rs
//! Shader constants and GPU resources
//!
//! CPU-side constant buffers, the PVW matrix registry, the wire effect and
//! the depth texture.

pub mod constant_buffer;
pub mod pvw_matrices;
pub mod texture_resource;
pub mod wire_effect;

// Re-export main types
pub use constant_buffer::{BufferId, BufferPool, ConstantBuffer};
pub use pvw_matrices::PvwMatrices;
pub use texture_resource::TextureResource;
pub use wire_effect::{WireEffect, WireParameters};
