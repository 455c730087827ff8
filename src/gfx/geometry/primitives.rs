use std::f32::consts::PI;

use super::MeshData;

/// Generates the primitive shapes used by the viewer scenes.
///
/// All shapes are centered at the model-space origin with +z as their axis
/// of symmetry and counter-clockwise outward-facing triangles.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshFactory;

impl MeshFactory {
    /// Sphere with single pole vertices.
    ///
    /// `z_samples` counts the latitude levels including both poles (at least
    /// 3); `radial_samples` is the number of vertices around each ring (at
    /// least 3).
    pub fn create_sphere(&self, z_samples: u32, radial_samples: u32, radius: f32) -> MeshData {
        let rings = z_samples.max(3) - 2;
        let around = radial_samples.max(3);
        let mut data = MeshData::new();

        data.vertices.push([0.0, 0.0, -radius]);
        for ring in 1..=rings {
            let theta = PI - ring as f32 * PI / (rings + 1) as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for j in 0..around {
                let phi = j as f32 * 2.0 * PI / around as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                data.vertices.push([
                    radius * sin_theta * cos_phi,
                    radius * sin_theta * sin_phi,
                    radius * cos_theta,
                ]);
            }
        }
        let north = data.vertices.len() as u32;
        data.vertices.push([0.0, 0.0, radius]);

        let ring_start = |ring: u32| 1 + ring * around;

        for j in 0..around {
            let next = (j + 1) % around;
            data.indices
                .extend_from_slice(&[0, ring_start(0) + next, ring_start(0) + j]);
        }

        for ring in 0..rings - 1 {
            let lower = ring_start(ring);
            let upper = ring_start(ring + 1);
            for j in 0..around {
                let next = (j + 1) % around;
                data.indices.extend_from_slice(&[
                    lower + j,
                    lower + next,
                    upper + next,
                    lower + j,
                    upper + next,
                    upper + j,
                ]);
            }
        }

        let top = ring_start(rings - 1);
        for j in 0..around {
            let next = (j + 1) % around;
            data.indices.extend_from_slice(&[north, top + j, top + next]);
        }

        data
    }

    /// Torus around the z axis.
    ///
    /// `circle_samples` vertices run along the main ring of radius
    /// `outer_radius`; `radial_samples` vertices run around the tube of
    /// radius `inner_radius`.
    pub fn create_torus(
        &self,
        circle_samples: u32,
        radial_samples: u32,
        outer_radius: f32,
        inner_radius: f32,
    ) -> MeshData {
        let circle = circle_samples.max(3);
        let tube = radial_samples.max(3);
        let mut data = MeshData::new();

        for i in 0..circle {
            let u = i as f32 * 2.0 * PI / circle as f32;
            let (sin_u, cos_u) = u.sin_cos();
            for j in 0..tube {
                let v = j as f32 * 2.0 * PI / tube as f32;
                let (sin_v, cos_v) = v.sin_cos();
                let reach = outer_radius + inner_radius * cos_v;
                data.vertices
                    .push([reach * cos_u, reach * sin_u, inner_radius * sin_v]);
            }
        }

        let index = |i: u32, j: u32| (i % circle) * tube + (j % tube);
        for i in 0..circle {
            for j in 0..tube {
                let a = index(i, j);
                let b = index(i + 1, j);
                let c = index(i + 1, j + 1);
                let d = index(i, j + 1);
                data.indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        data
    }

    /// Regular octahedron with vertices on the unit axes.
    pub fn create_octahedron(&self) -> MeshData {
        MeshData {
            vertices: vec![
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ],
            #[rustfmt::skip]
            indices: vec![
                4, 0, 2,  4, 2, 1,  4, 1, 3,  4, 3, 0,
                5, 2, 0,  5, 1, 2,  5, 3, 1,  5, 0, 3,
            ],
        }
    }
}
