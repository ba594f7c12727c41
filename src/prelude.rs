//! Convenience re-exports for typical viewer/editor integrations.

pub use crate::error::SceneError;
pub use crate::gfx::{
    pick, Camera, DeltaMode, DirectionalLight, FilterMode, Material, MeshGeometry, MeshNode, Node,
    NodeKind, NodePath, PickHit, PointLight, Projection, Ray, Scene, Texture, Transform, Vertex,
};
pub use crate::import::{build_scene, parse_mtl, parse_obj, ImportIssue, SceneDescription};
pub use crate::loader::{load_scene, resolve_textures, AssetSource, DirSource, MemorySource};
pub use crate::util::{hex2rgb, rgb2hex};
