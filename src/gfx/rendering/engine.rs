//! The graphics device as seen by the viewer.
//!
//! The viewer never talks to wgpu directly. It creates programs and meshes,
//! pushes constant buffers and issues draws through [`GraphicsEngine`], so a
//! frame can be driven without a GPU.

use std::path::Path;

use crate::{
    error::SetupError,
    gfx::{
        geometry::MeshData,
        resources::constant_buffer::{BufferId, ConstantBuffer},
        scene::node::Visual,
    },
};

/// Handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(usize);

impl ProgramId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to uploaded mesh geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

impl MeshId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

pub trait GraphicsEngine {
    /// Compiles the shader program at `path`.
    fn create_program(&mut self, path: &Path) -> Result<ProgramId, SetupError>;

    /// Uploads `mesh` for drawing.
    fn create_mesh(&mut self, mesh: &MeshData) -> MeshId;

    fn set_clear_color(&mut self, color: [f32; 4]);

    /// Starts a frame by clearing the color and depth buffers.
    fn clear_buffers(&mut self);

    /// Uploads the contents of a constant buffer.
    fn update(&mut self, id: BufferId, buffer: &ConstantBuffer);

    fn draw(&mut self, visual: &Visual);

    /// Draws `text` with its baseline-left corner at pixel `(x, y)`, origin
    /// top-left.
    fn draw_text(&mut self, x: i32, y: i32, color: [f32; 4], text: &str);

    /// Presents the frame.
    fn display_color_buffer(&mut self);

    /// Whether clip-space depth runs over [0, 1] rather than [-1, 1].
    fn has_depth_range_01(&self) -> bool;
}
