//! # Vertex Data Structures
//!
//! GPU-side vertex format for wireframe rendering.

/// A vertex carrying its position and the barycentric coordinate of its
/// corner within the triangle it belongs to.
///
/// Triangles are de-indexed before upload so that every corner gets a
/// distinct barycentric: (1,0,0), (0,1,0), (0,0,1). The fragment shader
/// measures the distance to the nearest edge from the interpolated value.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireVertex {
    pub position: [f32; 3],
    pub barycentric: [f32; 3],
}

impl WireVertex {
    /// Corner barycentrics, in triangle order.
    pub const CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    /// Vertex buffer layout: position at location 0, barycentric at 1.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<WireVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        let layout = WireVertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
