//! Wire-mesh effect: a program plus the two constant buffers it reads.

use crate::gfx::rendering::engine::ProgramId;

use super::constant_buffer::BufferId;

/// Shader-side name of the per-visual matrix buffer.
pub const PVW_MATRIX_BINDING: &str = "PVWMatrix";
/// Shader-side name of the shared wire parameter buffer.
pub const WIRE_PARAMETERS_BINDING: &str = "WireParameters";

/// Edge thickness in pixels.
pub const DEFAULT_EDGE_WIDTH: f32 = 1.0;

/// Colors and viewport size read by the wire shader.
///
/// `window_size` holds width and height in pixels in `xy` and the edge
/// thickness in pixels in `z`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireParameters {
    pub mesh_color: [f32; 4],
    pub edge_color: [f32; 4],
    pub window_size: [f32; 4],
}

impl WireParameters {
    pub fn new(mesh_color: [f32; 4], edge_color: [f32; 4], width: u32, height: u32) -> Self {
        Self {
            mesh_color,
            edge_color,
            window_size: [width as f32, height as f32, DEFAULT_EDGE_WIDTH, 0.0],
        }
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size[0] = width as f32;
        self.window_size[1] = height as f32;
    }
}

/// Draw state attached to every visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEffect {
    pub program: ProgramId,
    /// Shared [`WireParameters`] buffer.
    pub parameters: BufferId,
    /// This visual's PVW matrix buffer.
    pub pvw_matrix: BufferId,
}
