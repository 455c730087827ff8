//! View-frustum culling.
//!
//! The culler builds the six world-space frustum planes from a camera and
//! walks the scene graph, pruning every subtree whose bounding sphere lies
//! entirely outside one of them. A plane that a group's sphere lies
//! entirely inside is skipped for the group's descendants.

use cgmath::InnerSpace;

use super::{
    bound::Plane,
    node::{NodeId, NodeKind, SceneGraph},
};
use crate::gfx::camera::Camera;

pub const PLANE_COUNT: usize = 6;

const ALL_PLANES: u32 = (1 << PLANE_COUNT) - 1;

/// Frustum planes, normals pointing into the frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumPlane {
    Near = 0,
    Far = 1,
    Left = 2,
    Right = 3,
    Bottom = 4,
    Top = 5,
}

#[derive(Debug, Clone)]
pub struct Culler {
    planes: [Plane; PLANE_COUNT],
    visible: Vec<NodeId>,
}

impl Culler {
    pub fn new() -> Self {
        let placeholder = Plane {
            normal: cgmath::Vector3::unit_z(),
            constant: 0.0,
        };
        Self {
            planes: [placeholder; PLANE_COUNT],
            visible: Vec::new(),
        }
    }

    /// Rebuilds the world-space planes of `camera`'s frustum.
    pub fn set_frustum(&mut self, camera: &Camera) {
        let eye = camera.position();
        let axes = camera.axes();
        let frustum = camera.frustum();
        let (d, u, r) = (axes.direction, axes.up, axes.right);
        let tan_y = frustum.tan_half_fov_y();
        let tan_x = frustum.aspect * tan_y;

        let near_point = eye + d * frustum.near;
        let far_point = eye + d * frustum.far;

        self.planes[FrustumPlane::Near as usize] = Plane::from_point(d, near_point);
        self.planes[FrustumPlane::Far as usize] = Plane::from_point(-d, far_point);
        self.planes[FrustumPlane::Left as usize] =
            Plane::from_point((r + d * tan_x).normalize(), eye);
        self.planes[FrustumPlane::Right as usize] =
            Plane::from_point((-r + d * tan_x).normalize(), eye);
        self.planes[FrustumPlane::Bottom as usize] =
            Plane::from_point((u + d * tan_y).normalize(), eye);
        self.planes[FrustumPlane::Top as usize] =
            Plane::from_point((-u + d * tan_y).normalize(), eye);
    }

    pub fn plane(&self, which: FrustumPlane) -> Plane {
        self.planes[which as usize]
    }

    /// Replaces the visible set with the visuals of `scene` that intersect
    /// `camera`'s frustum, in pre-order.
    ///
    /// Uses the scene's world bounds as of its last update.
    pub fn compute_visible_set(&mut self, camera: &Camera, scene: &SceneGraph) {
        self.set_frustum(camera);
        self.visible.clear();

        let mut stack = vec![(NodeId::from(scene.root()), ALL_PLANES)];
        while let Some((id, mask)) = stack.pop() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            let Some(bound) = node.world_bound() else {
                continue;
            };

            let mut remaining = mask;
            let mut culled = false;
            for (index, plane) in self.planes.iter().enumerate() {
                let bit = 1 << index;
                if remaining & bit == 0 {
                    continue;
                }
                match bound.which_side(plane) {
                    side if side < 0 => {
                        culled = true;
                        break;
                    }
                    side if side > 0 => remaining &= !bit,
                    _ => {}
                }
            }
            if culled {
                continue;
            }

            match node.kind() {
                NodeKind::Visual(_) => self.visible.push(id),
                NodeKind::Group { children } => {
                    stack.extend(children.iter().rev().map(|&child| (child, remaining)));
                }
            }
        }

        log::trace!("culler kept {} visuals", self.visible.len());
    }

    /// Result of the last [`Culler::compute_visible_set`].
    pub fn visible_set(&self) -> &[NodeId] {
        &self.visible
    }
}

impl Default for Culler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        rendering::engine::{MeshId, ProgramId},
        resources::{constant_buffer::BufferId, wire_effect::WireEffect},
        scene::{bound::BoundingSphere, node::Visual},
    };
    use cgmath::{EuclideanSpace, Point3, Vector3};

    fn visual() -> Visual {
        Visual {
            mesh: MeshId::new(0),
            effect: WireEffect {
                program: ProgramId::new(0),
                parameters: BufferId::new(0),
                pvw_matrix: BufferId::new(1),
            },
            model_bound: BoundingSphere::new(Point3::origin(), 1.0),
        }
    }

    fn camera_at_origin_facing(direction: Vector3<f32>) -> Camera {
        let mut camera = Camera::new(true);
        let up = Vector3::unit_y();
        camera.set_frame(Point3::origin(), direction, up, direction.cross(up));
        camera.set_frustum(60.0, 1.0, 0.1, 100.0);
        camera
    }

    fn scene_with(positions: &[[f32; 3]]) -> (SceneGraph, Vec<NodeId>) {
        let mut scene = SceneGraph::new();
        let ids = positions
            .iter()
            .map(|p| {
                let id = scene.attach_visual(scene.root(), "v", visual());
                scene.local_transform_mut(id).unwrap().set_translation(p[0], p[1], p[2]);
                id
            })
            .collect();
        scene.update();
        (scene, ids)
    }

    #[test]
    fn objects_behind_the_camera_are_culled() {
        let (scene, ids) = scene_with(&[
            [0.0, 0.0, 10.0],
            [0.0, 0.0, -10.0],
            [1.0, 0.0, 20.0],
            [1.0, 0.0, -20.0],
        ]);
        let mut culler = Culler::new();
        culler.compute_visible_set(&camera_at_origin_facing(Vector3::unit_z()), &scene);
        assert_eq!(culler.visible_set(), &[ids[0], ids[2]]);
    }

    #[test]
    fn straddling_a_plane_is_visible() {
        // Center just outside the left edge, sphere reaching in.
        let (scene, ids) = scene_with(&[[6.2, 0.0, 10.0], [9.0, 0.0, 10.0]]);
        let mut culler = Culler::new();
        let camera = camera_at_origin_facing(Vector3::unit_z());
        culler.compute_visible_set(&camera, &scene);
        assert_eq!(culler.visible_set(), &[ids[0]]);
    }

    #[test]
    fn beyond_far_plane_is_culled() {
        let (scene, _) = scene_with(&[[0.0, 0.0, 150.0]]);
        let mut culler = Culler::new();
        culler.compute_visible_set(&camera_at_origin_facing(Vector3::unit_z()), &scene);
        assert!(culler.visible_set().is_empty());
    }

    #[test]
    fn visible_set_is_replaced_each_pass() {
        let (scene, ids) = scene_with(&[[0.0, 0.0, 10.0], [0.0, 0.0, -10.0]]);
        let mut culler = Culler::new();
        culler.compute_visible_set(&camera_at_origin_facing(Vector3::unit_z()), &scene);
        assert_eq!(culler.visible_set(), &[ids[0]]);
        culler.compute_visible_set(&camera_at_origin_facing(-Vector3::unit_z()), &scene);
        assert_eq!(culler.visible_set(), &[ids[1]]);
    }

    #[test]
    fn planes_point_inward() {
        let camera = camera_at_origin_facing(Vector3::unit_z());
        let mut culler = Culler::new();
        culler.set_frustum(&camera);
        let inside = Point3::new(0.0, 0.0, 5.0);
        for which in [
            FrustumPlane::Near,
            FrustumPlane::Far,
            FrustumPlane::Left,
            FrustumPlane::Right,
            FrustumPlane::Bottom,
            FrustumPlane::Top,
        ] {
            assert!(culler.plane(which).signed_distance(inside) > 0.0, "{which:?}");
        }
    }

    #[test]
    fn nested_groups_are_pruned_as_a_whole() {
        let mut scene = SceneGraph::new();
        let behind = scene.add_group(scene.root(), "behind");
        scene.local_transform_mut(behind).unwrap().set_translation(0.0, 0.0, -10.0);
        for x in [-1.0, 1.0] {
            let id = scene.attach_visual(behind, "v", visual());
            scene.local_transform_mut(id).unwrap().set_translation(x, 0.0, 0.0);
        }
        let front = scene.attach_visual(scene.root(), "front", visual());
        scene.local_transform_mut(front).unwrap().set_translation(0.0, 0.0, 10.0);
        scene.update();

        let mut culler = Culler::new();
        culler.compute_visible_set(&camera_at_origin_facing(Vector3::unit_z()), &scene);
        assert_eq!(culler.visible_set(), &[front]);
    }
}
