//! # Procedural Geometry Generation
//!
//! Primitive shapes for the wire-mesh scenes, generated procedurally so that
//! no model files are needed.
//!
//! ```rust
//! use wiremesh::gfx::geometry::MeshFactory;
//!
//! let factory = MeshFactory;
//! let sphere = factory.create_sphere(16, 16, 1.0);
//! let torus = factory.create_torus(16, 16, 1.0, 0.5);
//! let octahedron = factory.create_octahedron();
//! assert!(sphere.triangle_count() > 0 && torus.triangle_count() > 0);
//! assert_eq!(octahedron.triangle_count(), 8);
//! ```

pub mod primitives;

pub use primitives::MeshFactory;

use crate::gfx::scene::{bound::BoundingSphere, vertex::WireVertex};

/// Indexed triangle mesh in model space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding sphere of the vertex positions, `None` for an empty mesh.
    pub fn model_bound(&self) -> Option<BoundingSphere> {
        BoundingSphere::from_points(&self.vertices)
    }

    /// Expands the indexed triangles into a flat vertex list with per-corner
    /// barycentric coordinates. Triangles referencing missing vertices are
    /// skipped.
    pub fn to_wire_vertices(&self) -> Vec<WireVertex> {
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = *self.vertices.get(tri[0] as usize)?;
                let b = *self.vertices.get(tri[1] as usize)?;
                let c = *self.vertices.get(tri[2] as usize)?;
                Some([a, b, c])
            })
            .flat_map(|corners| {
                corners
                    .into_iter()
                    .zip(WireVertex::CORNERS)
                    .map(|(position, barycentric)| WireVertex {
                        position,
                        barycentric,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_vertices_carry_corner_barycentrics() {
        let mesh = MeshData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2, 2, 1, 0],
        };
        let wire = mesh.to_wire_vertices();
        assert_eq!(wire.len(), 6);
        assert_eq!(wire[0].barycentric, [1.0, 0.0, 0.0]);
        assert_eq!(wire[4].barycentric, [0.0, 1.0, 0.0]);
        assert_eq!(wire[3].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn broken_triangles_are_skipped() {
        let mesh = MeshData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 7, 0, 1, 2, 0],
        };
        assert_eq!(mesh.to_wire_vertices().len(), 3);
    }

    #[test]
    fn empty_mesh_has_no_bound() {
        assert!(MeshData::new().model_bound().is_none());
    }
}
