//! # Scene Graph Nodes
//!
//! The scene is a tree of [`Node`]s. Each node owns its children and a
//! [`Transform`]; what a node *is* (plain group, mesh, light) is a tagged
//! variant rather than a class hierarchy, so consumers match exhaustively
//! on [`NodeKind`] instead of inspecting string tags.
//!
//! World matrices are never memoized: traversal composes them on the fly
//! with an explicit stack, so arbitrarily deep trees cannot overflow the
//! call stack and a delta applied to an ancestor is always visible in the
//! next traversal.

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::mesh::MeshNode;
use crate::gfx::transform::Transform;

/// Address of a node: child indices from the root. The root itself is the
/// empty path.
pub type NodePath = Vec<usize>;

/// Point light: position comes from the node's transform; colors are
/// irradiance values.
#[derive(Debug, Clone)]
pub struct PointLight {
    /// Diffuse irradiance color.
    pub diffuse: [f32; 3],
    /// Specular irradiance color.
    pub specular: [f32; 3],
    /// Distance attenuation coefficient.
    pub attenuation: f32,
}

/// Directional light: the local direction is carried into world space by
/// the node's world matrix.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Direction in the node's local frame.
    pub direction: Vector3<f32>,
}

/// Editor color sliders work in 0..255 per channel, which leaves the
/// normalized irradiance values too dim; light colors are sampled with
/// this fixed upscale.
pub const LIGHT_INTENSITY_SCALE: f32 = 2.0;

impl PointLight {
    /// World-space position: the node's local origin through its world
    /// matrix.
    pub fn world_position(&self, world: Matrix4<f32>) -> Vector3<f32> {
        (world * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    }

    pub fn scaled_diffuse(&self) -> [f32; 3] {
        scale_color(self.diffuse)
    }

    pub fn scaled_specular(&self) -> [f32; 3] {
        scale_color(self.specular)
    }
}

impl DirectionalLight {
    /// World-space direction: the local direction through the world matrix
    /// as a vector (w = 0), so translations do not bend it.
    pub fn world_direction(&self, world: Matrix4<f32>) -> Vector3<f32> {
        (world * self.direction.extend(0.0)).truncate()
    }

    pub fn scaled_diffuse(&self) -> [f32; 3] {
        scale_color(self.diffuse)
    }

    pub fn scaled_specular(&self) -> [f32; 3] {
        scale_color(self.specular)
    }
}

fn scale_color(color: [f32; 3]) -> [f32; 3] {
    [
        color[0] * LIGHT_INTENSITY_SCALE,
        color[1] * LIGHT_INTENSITY_SCALE,
        color[2] * LIGHT_INTENSITY_SCALE,
    ]
}

/// What a node carries, beyond its transform and children.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node; contributes only its transform.
    Group,
    Mesh(MeshNode),
    PointLight(PointLight),
    DirectionalLight(DirectionalLight),
}

/// One node of the scene tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name; not required to be unique.
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, transform: Transform, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform,
            kind,
            children: Vec::new(),
        }
    }

    /// Attaches a child. Children are only added at scene-build time;
    /// re-parenting is not supported.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Resolves a path relative to this node.
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?;
        }
        Some(current)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?;
        }
        Some(current)
    }

    /// This node's world matrix given its parent's world matrix.
    pub fn world_matrix(&self, parent_world: Matrix4<f32>) -> Matrix4<f32> {
        parent_world * self.transform.local()
    }

    /// Recomputes the world matrix of the node at `path` by walking down
    /// from this node (treated as the root). Iterative, so pathological
    /// depth cannot overflow the stack.
    pub fn world_matrix_of(&self, path: &[usize]) -> Option<Matrix4<f32>> {
        let mut world = self.transform.local();
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?;
            world = world * current.transform.local();
        }
        Some(world)
    }

    /// Depth-first pre-order traversal rooted at this node, yielding each
    /// node with its path and freshly composed world matrix. Sibling order
    /// is first-child-first and deterministic.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(Vec::new(), self, Matrix4::identity())],
        }
    }
}

/// Entry yielded by [`Node::walk`].
pub struct WalkEntry<'a> {
    pub path: NodePath,
    pub node: &'a Node,
    pub world: Matrix4<f32>,
}

/// Iterator over a node subtree; see [`Node::walk`].
pub struct Walk<'a> {
    // (path, node, parent world matrix)
    stack: Vec<(NodePath, &'a Node, Matrix4<f32>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node, parent_world) = self.stack.pop()?;
        let world = node.world_matrix(parent_world);

        for (index, child) in node.children.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(index);
            self.stack.push((child_path, child, world));
        }

        Some(WalkEntry { path, node, world })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    fn group(name: &str, translation: Vector3<f32>) -> Node {
        Node::new(name, Transform::from_translation(translation), NodeKind::Group)
    }

    #[test]
    fn test_root_world_matrix_is_local() {
        let root = group("root", Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            root.world_matrix_of(&[]).unwrap(),
            root.transform.local(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_child_world_is_parent_times_local() {
        let mut root = group("root", Vector3::new(1.0, 0.0, 0.0));
        root.add_child(group("child", Vector3::new(0.0, 2.0, 0.0)));

        let expected =
            root.transform.local() * root.children()[0].transform.local();
        assert_relative_eq!(root.world_matrix_of(&[0]).unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_ancestor_delta_visible_in_next_traversal() {
        use crate::gfx::transform::DeltaMode;

        let mut root = group("root", Vector3::new(0.0, 0.0, 0.0));
        root.add_child(group("child", Vector3::new(1.0, 0.0, 0.0)));

        let before = root.world_matrix_of(&[0]).unwrap();
        root.transform.apply_delta(
            Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0)),
            DeltaMode::World,
        );
        let after = root.world_matrix_of(&[0]).unwrap();

        assert_relative_eq!(after.w.y - before.w.y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_walk_order_is_deterministic_preorder() {
        let mut root = group("root", Vector3::new(0.0, 0.0, 0.0));
        let mut a = group("a", Vector3::new(0.0, 0.0, 0.0));
        a.add_child(group("a0", Vector3::new(0.0, 0.0, 0.0)));
        root.add_child(a);
        root.add_child(group("b", Vector3::new(0.0, 0.0, 0.0)));

        let names: Vec<&str> = root.walk().map(|e| e.node.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "a0", "b"]);

        let paths: Vec<NodePath> = root.walk().map(|e| e.path).collect();
        assert_eq!(paths, vec![vec![], vec![0], vec![0, 0], vec![1]]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // Well past the depth-64 requirement.
        let mut root = group("0", Vector3::new(0.0, 0.0, 1.0));
        let mut path = Vec::new();
        {
            let mut current = &mut root;
            for i in 1..512 {
                current.add_child(group(&i.to_string(), Vector3::new(0.0, 0.0, 1.0)));
                current = &mut current.children_mut()[0];
                path.push(0);
            }
        }

        let world = root.world_matrix_of(&path).unwrap();
        assert_relative_eq!(world.w.z, 512.0, epsilon = 1e-3);
        assert_eq!(root.walk().count(), 512);
    }

    #[test]
    fn test_directional_light_ignores_translation() {
        let light = DirectionalLight {
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            direction: Vector3::new(0.0, -1.0, 0.0),
        };
        let world = Matrix4::from_translation(Vector3::new(10.0, 10.0, 10.0));
        let direction = light.world_direction(world);
        assert_relative_eq!(direction, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_point_light_world_position_under_parent() {
        let light = PointLight {
            diffuse: [1.0, 0.5, 0.25],
            specular: [1.0, 1.0, 1.0],
            attenuation: 0.2,
        };
        let world = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::from_translation(Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(
            light.world_position(world),
            Vector3::new(1.0, 3.0, 3.0),
            epsilon = 1e-6
        );
        assert_eq!(light.scaled_diffuse(), [2.0, 1.0, 0.5]);
    }
}
