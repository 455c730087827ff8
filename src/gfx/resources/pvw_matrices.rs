//! Projection-view-world matrix registry.
//!
//! Each subscribed visual owns a constant buffer holding
//! `projection * view * world`. [`PvwMatrices::update`] must run after any
//! camera change or scene update so no buffer goes stale.

use crate::gfx::{
    camera::{camera_utils::convert_matrix4_to_array, Camera},
    scene::node::{NodeId, SceneGraph},
};

use super::constant_buffer::{BufferId, BufferPool};

/// Column-major 4x4 matrix as stored in a PVW buffer.
pub type PvwMatrix = [[f32; 4]; 4];

pub const PVW_MATRIX_SIZE: usize = std::mem::size_of::<PvwMatrix>();

#[derive(Debug, Clone, Default)]
pub struct PvwMatrices {
    subscriptions: Vec<(NodeId, BufferId)>,
}

impl PvwMatrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `buffer` to receive the PVW matrix of `node`. A node can
    /// be subscribed once; returns `false` if it already is.
    pub fn subscribe(&mut self, node: NodeId, buffer: BufferId) -> bool {
        if self.is_subscribed(node) {
            return false;
        }
        self.subscriptions.push((node, buffer));
        true
    }

    pub fn unsubscribe(&mut self, node: NodeId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(subscribed, _)| *subscribed != node);
        self.subscriptions.len() != before
    }

    pub fn is_subscribed(&self, node: NodeId) -> bool {
        self.subscriptions.iter().any(|(subscribed, _)| *subscribed == node)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Writes `projection * view * world` into every subscribed buffer using
    /// the scene's current world transforms.
    pub fn update(&self, camera: &Camera, scene: &SceneGraph, buffers: &mut BufferPool) {
        let projection_view = camera.projection_view_matrix();
        for &(node, buffer) in &self.subscriptions {
            let Some(world) = scene.world_transform(node) else {
                log::warn!("PVW subscription for missing node {node:?}");
                continue;
            };
            let Some(target) = buffers.get_mut(buffer) else {
                log::warn!("PVW subscription for missing buffer {buffer:?}");
                continue;
            };
            target.set(&convert_matrix4_to_array(projection_view * world));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        rendering::engine::{MeshId, ProgramId},
        resources::{constant_buffer::ConstantBuffer, wire_effect::WireEffect},
        scene::{bound::BoundingSphere, node::Visual},
    };
    use cgmath::{EuclideanSpace, Point3, Vector3};

    struct Fixture {
        scene: SceneGraph,
        buffers: BufferPool,
        pvw: PvwMatrices,
        camera: Camera,
        node: NodeId,
        buffer: BufferId,
    }

    fn fixture() -> Fixture {
        let mut buffers = BufferPool::new();
        let buffer = buffers.create(ConstantBuffer::new("PVWMatrix", PVW_MATRIX_SIZE));
        let mut scene = SceneGraph::new();
        let node = scene.attach_visual(
            scene.root(),
            "sphere",
            Visual {
                mesh: MeshId::new(0),
                effect: WireEffect {
                    program: ProgramId::new(0),
                    parameters: BufferId::new(99),
                    pvw_matrix: buffer,
                },
                model_bound: BoundingSphere::new(Point3::origin(), 1.0),
            },
        );
        scene.local_transform_mut(node).unwrap().set_translation(0.0, 0.0, 4.0);
        scene.update();

        let mut camera = Camera::new(true);
        let (d, u) = (Vector3::unit_z(), Vector3::unit_y());
        camera.set_frame(Point3::origin(), d, u, d.cross(u));

        let mut pvw = PvwMatrices::new();
        assert!(pvw.subscribe(node, buffer));
        Fixture {
            scene,
            buffers,
            pvw,
            camera,
            node,
            buffer,
        }
    }

    fn stored(f: &Fixture) -> PvwMatrix {
        f.buffers.get(f.buffer).unwrap().get::<PvwMatrix>().unwrap()
    }

    fn expected(f: &Fixture) -> PvwMatrix {
        let world = f.scene.world_transform(f.node).unwrap();
        convert_matrix4_to_array(f.camera.projection_view_matrix() * world)
    }

    #[test]
    fn second_subscription_is_rejected() {
        let mut f = fixture();
        assert!(!f.pvw.subscribe(f.node, BufferId::new(5)));
        assert_eq!(f.pvw.len(), 1);
        assert!(f.pvw.unsubscribe(f.node));
        assert!(!f.pvw.unsubscribe(f.node));
        assert!(f.pvw.is_empty());
    }

    #[test]
    fn update_writes_projection_view_world() {
        let mut f = fixture();
        f.pvw.update(&f.camera, &f.scene, &mut f.buffers);
        assert_eq!(stored(&f), expected(&f));
        assert!(f.buffers.get(f.buffer).unwrap().is_dirty());
    }

    #[test]
    fn camera_moves_leave_buffers_stale_until_update() {
        let mut f = fixture();
        f.pvw.update(&f.camera, &f.scene, &mut f.buffers);
        let before = stored(&f);

        f.camera.set_position(Point3::new(0.0, 1.0, 0.0));
        assert_eq!(stored(&f), before);
        assert_ne!(stored(&f), expected(&f));

        f.pvw.update(&f.camera, &f.scene, &mut f.buffers);
        assert_eq!(stored(&f), expected(&f));
    }

    #[test]
    fn unsubscribed_nodes_are_not_written() {
        let mut f = fixture();
        f.pvw.unsubscribe(f.node);
        f.pvw.update(&f.camera, &f.scene, &mut f.buffers);
        assert_eq!(stored(&f), [[0.0; 4]; 4]);
    }
}
