// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Uniform buffers mirrored from constant buffers, and the layout entries
//! the wire-mesh bind group is built from.

pub mod binding_types;
pub mod uniform_buffer;

pub use binding_types::{uniform, uniform_entry};
pub use uniform_buffer::UniformBuffer;
