//! The loaded scene: one camera, one ambient color, one node tree.
//!
//! Everything core operations need lives on this context object; there is
//! no free-floating "active scene" or "active camera" state. After load,
//! external UI mutates only `ambient`, the camera's projection mode, and
//! individual nodes reached through [`Scene::node_mut`].

use cgmath::Matrix4;

use crate::gfx::camera::Camera;
use crate::gfx::node::{Node, NodeKind, NodePath, Walk};

/// A fully built scene.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Ambient light color, mutable post-load.
    pub ambient: [f32; 3],
    /// The single active camera.
    pub camera: Camera,
    /// Root of the node tree.
    pub root: Node,
}

impl Scene {
    /// Resolves a node path from the root.
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        self.root.node(path)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        self.root.node_mut(path)
    }

    /// Recomputes the world matrix of the node at `path`.
    pub fn world_matrix(&self, path: &NodePath) -> Option<Matrix4<f32>> {
        self.root.world_matrix_of(path)
    }

    /// Deterministic depth-first traversal of the whole tree.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    /// Paths of all light nodes, in traversal order. The editor cycles
    /// through these for its light controls.
    pub fn light_paths(&self) -> Vec<NodePath> {
        self.walk()
            .filter(|entry| {
                matches!(
                    entry.node.kind,
                    NodeKind::PointLight(_) | NodeKind::DirectionalLight(_)
                )
            })
            .map(|entry| entry.path)
            .collect()
    }
}
