//! Hierarchical transform nodes
//!
//! An owning tree: the graph holds every node, children refer to their
//! parent by `NodeId` and carry parent-relative offsets. World transforms are
//! composed on demand by walking up the chain.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::mesh::Mesh;

/// Index of a node inside its `SceneGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A transform node, optionally carrying geometry
#[derive(Debug, Clone)]
pub struct Node {
    /// Offset from the parent origin
    pub position: Vec3,
    /// Euler rotation (radians, XYZ order)
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub mesh: Option<Mesh>,
}

impl Node {
    fn new(parent: Option<NodeId>, position: Vec3, mesh: Option<Mesh>) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            parent,
            children: Vec::new(),
            mesh,
        }
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z),
            self.position,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Empty group at `position` relative to `parent`
    pub fn add_group(&mut self, parent: Option<NodeId>, position: Vec3) -> NodeId {
        self.insert(Node::new(parent, position, None))
    }

    /// Geometry node at `position` relative to `parent`
    pub fn add_mesh(&mut self, parent: Option<NodeId>, position: Vec3, mesh: Mesh) -> NodeId {
        self.insert(Node::new(parent, position, Some(mesh)))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Composed transform from the tree root down to `id`
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let node = self.node(id);
        let local = node.local_transform();
        match node.parent {
            Some(parent) => self.world_transform(parent) * local,
            None => local,
        }
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_transform(id).transform_point3(Vec3::ZERO)
    }

    /// Every geometry node beneath (and including) `root` with its world transform
    pub fn meshes_under(&self, root: NodeId) -> Vec<(NodeId, Mat4)> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.mesh.is_some() {
                out.push((id, self.world_transform(id)));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::create_box;

    #[test]
    fn test_child_offsets_compose() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Vec3::new(0.0, 0.0, -4000.0));
        let arm = graph.add_group(Some(root), Vec3::new(-100.0, 190.0, -10.0));
        let lower = graph.add_group(Some(arm), Vec3::new(0.0, -170.0, 0.0));

        let p = graph.world_position(lower);
        assert!((p - Vec3::new(-100.0, 20.0, -4010.0)).length() < 1e-3);

        graph.node_mut(root).position.x = 800.0;
        let p = graph.world_position(lower);
        assert!((p.x - 700.0).abs() < 1e-3);
    }

    #[test]
    fn test_parent_rotation_moves_child() {
        let mut graph = SceneGraph::new();
        let shoulder = graph.add_group(None, Vec3::ZERO);
        let hand = graph.add_group(Some(shoulder), Vec3::new(0.0, -1.0, 0.0));
        graph.node_mut(shoulder).rotation.x = std::f32::consts::FRAC_PI_2;
        let p = graph.world_position(hand);
        // -Y rotated 90 degrees about X lands on -Z
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_meshes_under_collects_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, Vec3::ZERO);
        let head = graph.add_group(Some(root), Vec3::Y);
        graph.add_mesh(Some(head), Vec3::ZERO, create_box(Vec3::ONE, 0, Vec3::ZERO));
        graph.add_mesh(Some(root), Vec3::ZERO, create_box(Vec3::ONE, 0, Vec3::ZERO));
        let other = graph.add_group(None, Vec3::ZERO);
        graph.add_mesh(Some(other), Vec3::ZERO, create_box(Vec3::ONE, 0, Vec3::ZERO));

        assert_eq!(graph.meshes_under(root).len(), 2);
        assert_eq!(graph.len(), 6);
    }
}
