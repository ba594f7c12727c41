//! Geometric core: scene graph, camera, mesh data and picking.

pub mod camera;
pub mod material;
pub mod mesh;
pub mod node;
pub mod picking;
pub mod scene;
pub mod transform;
pub mod vertex;

pub use camera::{Camera, Projection};
pub use material::{FilterMode, Material, Texture};
pub use mesh::{MeshGeometry, MeshNode};
pub use node::{DirectionalLight, Node, NodeKind, NodePath, PointLight};
pub use picking::{pick, PickHit, Ray};
pub use scene::Scene;
pub use transform::{DeltaMode, Transform};
pub use vertex::Vertex;
