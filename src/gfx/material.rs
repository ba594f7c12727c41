//! Phong material parameters and texture handles.
//!
//! Materials come out of the MTL importer; textures are only *references*
//! here (path plus optionally resolved bytes). GPU realization is the
//! renderer's concern and happens outside this crate.

/// Texture minification/magnification filtering requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Linear,
    Nearest,
}

/// A texture referenced by a material.
///
/// Created unresolved at scene-build time; the loader's pre-render phase
/// fills in the bytes. An unready texture means the mesh renders untextured.
#[derive(Debug, Clone)]
pub struct Texture {
    /// Source path, relative to the asset root.
    pub path: String,
    bytes: Option<Vec<u8>>,
}

impl Texture {
    pub fn pending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bytes: None,
        }
    }

    /// Whether the image bytes have been fetched.
    pub fn ready(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub(crate) fn resolve(&mut self, bytes: Vec<u8>) {
        self.bytes = Some(bytes);
    }
}

/// Phong shading coefficients plus optional texture maps.
#[derive(Debug, Clone)]
pub struct Material {
    /// Ambient reflectivity (`Ka`).
    pub ambient: [f32; 3],
    /// Diffuse reflectivity (`Kd`).
    pub diffuse: [f32; 3],
    /// Specular reflectivity (`Ks`).
    pub specular: [f32; 3],
    /// Specular exponent (`Ns`).
    pub shininess: f32,
    /// Diffuse color texture (`map_Kd`).
    pub diffuse_map: Option<Texture>,
    /// Tangent-space normal map (`map_Bump`).
    pub normal_map: Option<Texture>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            shininess: 32.0,
            diffuse_map: None,
            normal_map: None,
        }
    }
}
