//! Arena-backed scene hierarchy.
//!
//! Nodes live in a single `Vec` and refer to each other by index. A parent
//! is always created before its children, so ascending index order is a
//! valid top-down traversal and descending order a valid bottom-up one.

use cgmath::{Matrix3, Matrix4, SquareMatrix, Vector3};

use super::bound::BoundingSphere;
use crate::gfx::{rendering::engine::MeshId, resources::wire_effect::WireEffect};

/// Handle to any node of a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a group node. Only groups can take children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(NodeId);

impl GroupId {
    pub fn node(self) -> NodeId {
        self.0
    }
}

impl From<GroupId> for NodeId {
    fn from(group: GroupId) -> Self {
        group.0
    }
}

/// Local transform: scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Matrix3<f32>,
    pub scale: f32,
}

impl Transform {
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Vector3::new(x, y, z);
    }

    pub fn set_rotation(&mut self, rotation: Matrix3<f32>) {
        self.rotation = rotation;
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Matrix3::identity(),
            scale: 1.0,
        }
    }
}

/// A drawable leaf: a mesh, the effect it is drawn with and its model-space
/// bound.
#[derive(Debug, Clone)]
pub struct Visual {
    pub mesh: MeshId,
    pub effect: WireEffect,
    pub model_bound: BoundingSphere,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group { children: Vec<NodeId> },
    Visual(Visual),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub local: Transform,
    world: Matrix4<f32>,
    world_bound: Option<BoundingSphere>,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl SceneNode {
    fn new(name: &str, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            local: Transform::default(),
            world: Matrix4::identity(),
            world_bound: None,
            parent,
            kind,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// World matrix as of the last [`SceneGraph::update`].
    pub fn world_transform(&self) -> Matrix4<f32> {
        self.world
    }

    /// World bound as of the last [`SceneGraph::update`]. `None` for a group
    /// with no visual below it.
    pub fn world_bound(&self) -> Option<BoundingSphere> {
        self.world_bound
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Visual(_) => &[],
        }
    }

    pub fn visual(&self) -> Option<&Visual> {
        match &self.kind {
            NodeKind::Visual(visual) => Some(visual),
            NodeKind::Group { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Creates a graph holding an empty root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new(
                "root",
                None,
                NodeKind::Group {
                    children: Vec::new(),
                },
            )],
        }
    }

    pub fn root(&self) -> GroupId {
        GroupId(NodeId(0))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_group(&mut self, parent: GroupId, name: &str) -> GroupId {
        let kind = NodeKind::Group {
            children: Vec::new(),
        };
        GroupId(self.attach(parent, name, kind))
    }

    pub fn attach_visual(&mut self, parent: GroupId, name: &str, visual: Visual) -> NodeId {
        self.attach(parent, name, NodeKind::Visual(visual))
    }

    fn attach(&mut self, parent: GroupId, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(name, Some(parent.0), kind));
        if let Some(NodeKind::Group { children }) =
            self.nodes.get_mut(parent.0 .0).map(|node| &mut node.kind)
        {
            children.push(id);
        }
        id
    }

    pub fn node(&self, id: impl Into<NodeId>) -> Option<&SceneNode> {
        self.nodes.get(id.into().0)
    }

    pub fn local_transform_mut(&mut self, id: impl Into<NodeId>) -> Option<&mut Transform> {
        self.nodes.get_mut(id.into().0).map(|node| &mut node.local)
    }

    pub fn world_transform(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.node(id).map(SceneNode::world_transform)
    }

    pub fn world_bound(&self, id: NodeId) -> Option<BoundingSphere> {
        self.node(id).and_then(SceneNode::world_bound)
    }

    pub fn visual(&self, id: NodeId) -> Option<&Visual> {
        self.node(id).and_then(SceneNode::visual)
    }

    /// Recomputes world matrices top-down and world bounds bottom-up.
    ///
    /// Call after editing any local transform and before reading world
    /// data, computing PVW matrices or culling.
    pub fn update(&mut self) {
        for index in 0..self.nodes.len() {
            let parent_world = match self.nodes[index].parent {
                Some(parent) => self.nodes[parent.0].world,
                None => Matrix4::identity(),
            };
            let node = &mut self.nodes[index];
            node.world = parent_world * node.local.matrix();
        }

        for index in (0..self.nodes.len()).rev() {
            let bound = match &self.nodes[index].kind {
                NodeKind::Visual(visual) => {
                    Some(visual.model_bound.transformed(&self.nodes[index].world))
                }
                NodeKind::Group { children } => children
                    .iter()
                    .filter_map(|child| self.nodes[child.0].world_bound)
                    .reduce(|merged, bound| merged.merged(&bound)),
            };
            self.nodes[index].world_bound = bound;
        }
    }

    /// Every visual leaf in pre-order, borrowed from the graph.
    pub fn visuals(&self) -> Visuals<'_> {
        Visuals {
            graph: self,
            stack: vec![NodeId(0)],
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy pre-order walk over the visual leaves of a [`SceneGraph`].
pub struct Visuals<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Visuals<'a> {
    type Item = (NodeId, &'a Visual);

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.graph;
        while let Some(id) = self.stack.pop() {
            let Some(node) = graph.nodes.get(id.0) else {
                continue;
            };
            match &node.kind {
                NodeKind::Visual(visual) => return Some((id, visual)),
                NodeKind::Group { children } => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}
