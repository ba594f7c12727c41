//! # Asset Loading
//!
//! Scene, mesh, material and texture content is fetched through the
//! [`AssetSource`] abstraction: [`DirSource`] reads from a directory on
//! disk, [`MemorySource`] serves embedded or test fixtures.
//!
//! Texture images are not needed to build the scene tree, so the builder
//! only records their paths. [`resolve_textures`] is the explicit
//! pre-render loading phase: it fetches every referenced image
//! concurrently and blocks until all of them settle, so the render loop
//! starts with a fully loaded scene. A texture whose fetch failed stays
//! unready and its mesh simply renders untextured.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use log::{debug, warn};

use crate::error::SceneError;
use crate::gfx::material::Texture;
use crate::gfx::node::{Node, NodeKind};
use crate::gfx::scene::Scene;
use crate::import::scene::build_scene;
use crate::import::SceneDescription;

/// Source of scene assets, addressed by `/`-separated relative paths.
pub trait AssetSource {
    fn load_text(&self, path: &str) -> Result<String, SceneError>;
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>, SceneError>;
}

/// Filesystem-backed source rooted at a directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirSource {
    fn load_text(&self, path: &str) -> Result<String, SceneError> {
        fs::read_to_string(self.root.join(path)).map_err(|source| SceneError::Io {
            path: path.to_string(),
            source,
        })
    }

    fn load_bytes(&self, path: &str) -> Result<Vec<u8>, SceneError> {
        fs::read(self.root.join(path)).map_err(|source| SceneError::Io {
            path: path.to_string(),
            source,
        })
    }
}

/// In-memory source for tests and embedded assets.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn load_text(&self, path: &str) -> Result<String, SceneError> {
        let bytes = self.load_bytes(path)?;
        String::from_utf8(bytes).map_err(|_| SceneError::AssetNotFound(path.to_string()))
    }

    fn load_bytes(&self, path: &str) -> Result<Vec<u8>, SceneError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SceneError::AssetNotFound(path.to_string()))
    }
}

/// Loads, builds and fully resolves a scene from a JSON document on disk.
///
/// Asset paths inside the document are resolved relative to the document's
/// directory.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let description: SceneDescription = serde_json::from_str(&text)?;

    let source = DirSource::new(path.parent().unwrap_or_else(|| Path::new(".")));
    let mut scene = build_scene(&description, &source)?;
    resolve_textures(&mut scene, &source);
    Ok(scene)
}

/// Fetches every unresolved texture referenced by the scene, all at once,
/// and blocks until the batch settles. Returns the number of textures that
/// became ready.
pub fn resolve_textures(scene: &mut Scene, source: &dyn AssetSource) -> usize {
    let mut pending: Vec<String> = Vec::new();
    for entry in scene.walk() {
        if let NodeKind::Mesh(mesh) = &entry.node.kind {
            for texture in [&mesh.material.diffuse_map, &mesh.material.normal_map]
                .into_iter()
                .flatten()
            {
                if !texture.ready() && !pending.contains(&texture.path) {
                    pending.push(texture.path.clone());
                }
            }
        }
    }

    if pending.is_empty() {
        return 0;
    }
    debug!("resolving {} texture(s)", pending.len());

    let fetched = pollster::block_on(async {
        let tasks = pending.into_iter().map(|path| async move {
            let result = source.load_bytes(&path);
            (path, result)
        });
        join_all(tasks).await
    });

    let mut bytes_by_path: HashMap<String, Vec<u8>> = HashMap::new();
    for (path, result) in fetched {
        match result {
            Ok(bytes) => {
                bytes_by_path.insert(path, bytes);
            }
            Err(error) => warn!("texture `{}` failed to load: {}", path, error),
        }
    }

    let mut resolved = 0;
    let mut stack: Vec<&mut Node> = vec![&mut scene.root];
    while let Some(node) = stack.pop() {
        if let NodeKind::Mesh(mesh) = &mut node.kind {
            for texture in [&mut mesh.material.diffuse_map, &mut mesh.material.normal_map]
                .into_iter()
                .flatten()
            {
                resolved += assign_bytes(texture, &bytes_by_path);
            }
        }
        stack.extend(node.children_mut().iter_mut());
    }

    resolved
}

fn assign_bytes(texture: &mut Texture, bytes_by_path: &HashMap<String, Vec<u8>>) -> usize {
    if texture.ready() {
        return 0;
    }
    match bytes_by_path.get(&texture.path) {
        Some(bytes) => {
            texture.resolve(bytes.clone());
            1
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_round_trip() {
        let mut source = MemorySource::new();
        source.insert("a/b.txt", "hello");

        assert_eq!(source.load_text("a/b.txt").unwrap(), "hello");
        assert!(matches!(
            source.load_text("missing.txt"),
            Err(SceneError::AssetNotFound(_))
        ));
    }
}
