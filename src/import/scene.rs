//! Scene document parsing and tree materialization.
//!
//! The document is JSON with a recursive `root` node; `type` selects the
//! node flavor and `light_type` the light flavor. Deserialization is
//! strict: a missing required field fails the whole scene load (there is
//! no guessing of defaults for absent document fields).

use cgmath::{Deg, Point3, Rad, Vector3};
use serde::Deserialize;

use crate::error::SceneError;
use crate::gfx::camera::{Camera, Projection};
use crate::gfx::material::{Material, Texture};
use crate::gfx::mesh::MeshNode;
use crate::gfx::node::{DirectionalLight, Node, NodeKind, PointLight};
use crate::gfx::scene::Scene;
use crate::gfx::transform::Transform;
use crate::import::{parse_mtl, parse_obj};
use crate::loader::AssetSource;
use crate::util::hex2rgb;

/// Top-level scene document.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    pub ambient: [f32; 3],
    pub camera: CameraDescription,
    pub root: NodeDescription,
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraDescription {
    #[serde(rename = "type")]
    pub projection: ProjectionMode,
    pub position: [f32; 3],
    pub lookat: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDescription {
    Node(GroupDescription),
    Object(ObjectDescription),
    Light(LightDescription),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupDescription {
    pub name: String,
    pub translation: [f32; 3],
    /// Rotation *axis*; the load-time angle is always zero.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    /// Mesh file path, relative to the scene document.
    pub obj: String,
    /// Fallback vertex color as a 6-digit hex string.
    pub color: String,
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightDescription {
    pub name: String,
    #[serde(flatten)]
    pub kind: LightKindDescription,
    pub children: Vec<NodeDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "light_type", rename_all = "lowercase")]
pub enum LightKindDescription {
    Point {
        position: [f32; 3],
        /// Diffuse irradiance color.
        id: [f32; 3],
        /// Specular irradiance color.
        is: [f32; 3],
        /// Attenuation coefficient.
        k: f32,
    },
    Directional {
        direction: [f32; 3],
        id: [f32; 3],
        is: [f32; 3],
    },
}

/// Materializes a parsed document into a scene, pulling mesh and material
/// files through `assets`. Textures stay unresolved; run
/// [`crate::loader::resolve_textures`] afterwards.
pub fn build_scene(
    description: &SceneDescription,
    assets: &dyn AssetSource,
) -> Result<Scene, SceneError> {
    let camera = build_camera(&description.camera);
    let root = build_node(&description.root, assets)?;
    Ok(Scene {
        ambient: description.ambient,
        camera,
        root,
    })
}

fn build_camera(description: &CameraDescription) -> Camera {
    let projection = match description.projection {
        ProjectionMode::Perspective => Projection::Perspective,
        ProjectionMode::Orthographic => Projection::Orthographic,
    };
    Camera::new(
        Point3::from(description.position),
        Point3::from(description.lookat),
        Vector3::from(description.up),
        Deg(description.fov),
        projection,
    )
}

fn build_node(description: &NodeDescription, assets: &dyn AssetSource) -> Result<Node, SceneError> {
    let (mut node, children) = match description {
        NodeDescription::Node(group) => (
            Node::new(
                &group.name,
                placed_transform(group.translation, group.rotation, group.scale),
                NodeKind::Group,
            ),
            &group.children,
        ),
        NodeDescription::Object(object) => (
            build_object(object, assets)?,
            &object.children,
        ),
        NodeDescription::Light(light) => (build_light(light), &light.children),
    };

    for child in children {
        node.add_child(build_node(child, assets)?);
    }
    Ok(node)
}

fn build_object(description: &ObjectDescription, assets: &dyn AssetSource) -> Result<Node, SceneError> {
    let fallback_color = hex2rgb(&description.color)?;
    let obj_text = assets.load_text(&description.obj)?;
    let import = parse_obj(&obj_text, fallback_color);

    // Material comes from the OBJ's mtllib companion, if it names one.
    let material = match &import.mtllib {
        Some(mtllib) => {
            let mtl_path = resolve_relative(&description.obj, mtllib);
            let mtl = parse_mtl(&assets.load_text(&mtl_path)?);
            Material {
                ambient: mtl.ambient,
                diffuse: mtl.diffuse,
                specular: mtl.specular,
                shininess: mtl.shininess,
                diffuse_map: mtl
                    .diffuse_map
                    .map(|map| Texture::pending(resolve_relative(&mtl_path, &map))),
                normal_map: mtl
                    .normal_map
                    .map(|map| Texture::pending(resolve_relative(&mtl_path, &map))),
            }
        }
        None => Material::default(),
    };

    Ok(Node::new(
        &description.name,
        placed_transform(description.translation, description.rotation, description.scale),
        NodeKind::Mesh(MeshNode::new(import.geometry, material)),
    ))
}

fn build_light(description: &LightDescription) -> Node {
    match &description.kind {
        LightKindDescription::Point { position, id, is, k } => Node::new(
            &description.name,
            Transform::from_translation(Vector3::from(*position)),
            NodeKind::PointLight(PointLight {
                diffuse: *id,
                specular: *is,
                attenuation: *k,
            }),
        ),
        LightKindDescription::Directional { direction, id, is } => Node::new(
            &description.name,
            Transform::identity(),
            NodeKind::DirectionalLight(DirectionalLight {
                diffuse: *id,
                specular: *is,
                direction: Vector3::from(*direction),
            }),
        ),
    }
}

fn placed_transform(translation: [f32; 3], rotation_axis: [f32; 3], scale: [f32; 3]) -> Transform {
    Transform::new(
        Vector3::from(translation),
        Vector3::from(rotation_axis),
        Rad(0.0),
        Vector3::from(scale),
    )
}

/// Resolves `target` against the directory of `reference` (both
/// `/`-separated asset paths).
pub(crate) fn resolve_relative(reference: &str, target: &str) -> String {
    match reference.rfind('/') {
        Some(index) => format!("{}{}", &reference[..index + 1], target),
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::Projection;
    use crate::loader::{resolve_textures, MemorySource};

    const SCENE_JSON: &str = r##"{
        "ambient": [0.2, 0.2, 0.2],
        "camera": {
            "type": "perspective",
            "position": [0.0, 2.0, 8.0],
            "lookat": [0.0, 0.0, 0.0],
            "up": [0.0, 1.0, 0.0],
            "fov": 60.0
        },
        "root": {
            "type": "node",
            "name": "root",
            "translation": [0.0, 0.0, 0.0],
            "rotation": [0.0, 0.0, 0.0],
            "scale": [1.0, 1.0, 1.0],
            "children": [
                {
                    "type": "object",
                    "name": "tri",
                    "obj": "models/tri.obj",
                    "color": "#FF8000",
                    "translation": [1.0, 0.0, 0.0],
                    "rotation": [0.0, 1.0, 0.0],
                    "scale": [1.0, 1.0, 1.0],
                    "children": []
                },
                {
                    "type": "light",
                    "name": "lamp",
                    "light_type": "point",
                    "position": [2.0, 3.0, 0.0],
                    "id": [1.0, 0.9, 0.8],
                    "is": [1.0, 1.0, 1.0],
                    "k": 0.25,
                    "children": []
                },
                {
                    "type": "light",
                    "name": "sun",
                    "light_type": "directional",
                    "direction": [0.0, -1.0, 0.0],
                    "id": [0.5, 0.5, 0.5],
                    "is": [1.0, 1.0, 1.0],
                    "children": []
                }
            ]
        }
    }"##;

    const TRI_OBJ: &str = "\
mtllib tri.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    const TRI_MTL: &str = "\
Ka 0.2 0.2 0.2
Kd 0.7 0.7 0.7
Ks 1.0 1.0 1.0
Ns 16.0
map_Kd maps/diffuse.png
";

    fn fixture_source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert("models/tri.obj", TRI_OBJ);
        source.insert("models/tri.mtl", TRI_MTL);
        source.insert("models/maps/diffuse.png", vec![0x89u8, 0x50, 0x4E, 0x47]);
        source
    }

    fn mesh_of<'a>(scene: &'a Scene, path: &[usize]) -> &'a MeshNode {
        match &scene.root.node(path).unwrap().kind {
            NodeKind::Mesh(mesh) => mesh,
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_build_scene_from_document() {
        let description = SceneDescription::from_json(SCENE_JSON).unwrap();
        let scene = build_scene(&description, &fixture_source()).unwrap();

        assert_eq!(scene.ambient, [0.2, 0.2, 0.2]);
        assert_eq!(scene.camera.projection(), Projection::Perspective);
        assert_eq!(scene.root.children().len(), 3);

        let mesh = mesh_of(&scene, &[0]);
        assert_eq!(mesh.geometry.vertex_count(), 3);
        // Fallback color comes from the object's hex color field.
        assert_eq!(mesh.geometry.vertices[0].color, [1.0, 128.0 / 255.0, 0.0]);
        assert_eq!(mesh.material.shininess, 16.0);
        assert_eq!(mesh.material.diffuse, [0.7, 0.7, 0.7]);

        // Map path resolved relative to the MTL file's directory.
        let texture = mesh.material.diffuse_map.as_ref().unwrap();
        assert_eq!(texture.path, "models/maps/diffuse.png");
        assert!(!texture.ready());

        match &scene.root.node(&[1]).unwrap().kind {
            NodeKind::PointLight(light) => {
                assert_eq!(light.diffuse, [1.0, 0.9, 0.8]);
                assert_eq!(light.attenuation, 0.25);
            }
            other => panic!("expected point light, got {:?}", other),
        }
        match &scene.root.node(&[2]).unwrap().kind {
            NodeKind::DirectionalLight(light) => {
                assert_eq!(light.direction, Vector3::new(0.0, -1.0, 0.0));
            }
            other => panic!("expected directional light, got {:?}", other),
        }

        assert_eq!(scene.light_paths(), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        // No "camera" key.
        let text = r#"{ "ambient": [0.0, 0.0, 0.0], "root": {
            "type": "node", "name": "root",
            "translation": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1],
            "children": [] } }"#;
        assert!(matches!(
            SceneDescription::from_json(text),
            Err(SceneError::Document(_))
        ));
    }

    #[test]
    fn test_object_without_mtllib_uses_default_material() {
        let description = SceneDescription::from_json(SCENE_JSON).unwrap();
        let mut source = fixture_source();
        source.insert("models/tri.obj", TRI_OBJ.replace("mtllib tri.mtl\n", ""));

        let scene = build_scene(&description, &source).unwrap();
        assert_eq!(mesh_of(&scene, &[0]).material.shininess, 32.0);
    }

    #[test]
    fn test_invalid_object_color_is_fatal() {
        let text = SCENE_JSON.replace("#FF8000", "tangerine");
        let description = SceneDescription::from_json(&text).unwrap();
        assert!(matches!(
            build_scene(&description, &fixture_source()),
            Err(SceneError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_missing_obj_file_is_fatal() {
        let description = SceneDescription::from_json(SCENE_JSON).unwrap();
        let source = MemorySource::new();
        assert!(matches!(
            build_scene(&description, &source),
            Err(SceneError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_texture_resolution_phase() {
        let description = SceneDescription::from_json(SCENE_JSON).unwrap();
        let source = fixture_source();
        let mut scene = build_scene(&description, &source).unwrap();

        let resolved = resolve_textures(&mut scene, &source);
        assert_eq!(resolved, 1);
        let texture = mesh_of(&scene, &[0]).material.diffuse_map.as_ref().unwrap();
        assert!(texture.ready());
        assert_eq!(texture.bytes().unwrap()[..2], [0x89, 0x50]);
    }

    #[test]
    fn test_missing_texture_stays_unready() {
        let description = SceneDescription::from_json(SCENE_JSON).unwrap();
        let mut source = fixture_source();
        source.insert("models/tri.mtl", "map_Kd missing.png\n");
        let mut scene = build_scene(&description, &source).unwrap();

        let resolved = resolve_textures(&mut scene, &source);
        assert_eq!(resolved, 0);
        assert!(!mesh_of(&scene, &[0])
            .material
            .diffuse_map
            .as_ref()
            .unwrap()
            .ready());
    }

    #[test]
    fn test_resolve_relative_paths() {
        assert_eq!(resolve_relative("models/tri.obj", "tri.mtl"), "models/tri.mtl");
        assert_eq!(
            resolve_relative("models/tri.mtl", "maps/d.png"),
            "models/maps/d.png"
        );
        assert_eq!(resolve_relative("flat.obj", "flat.mtl"), "flat.mtl");
    }
}
