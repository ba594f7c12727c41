//! Render-ready mesh data produced by the importer.

use cgmath::Vector3;

use crate::gfx::material::{FilterMode, Material};
use crate::gfx::vertex::Vertex;

/// Triangle-soup geometry in the layout the renderer consumes.
///
/// Vertices are emitted once per face corner (no deduplication), three
/// consecutive records per triangle. The side buffers carry one entry per
/// corner in the same order; `uvs` is empty when the source file had no
/// texture coordinates, in which case `tangents`/`bitangents` are empty too.
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<Vertex>,
    pub uvs: Vec<[f32; 2]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Interleaved `[px,py,pz, cr,cg,cb, nx,ny,nz]` view, stride 9.
    pub fn vertex_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flat UV view, stride 2.
    pub fn uv_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Flat tangent view, stride 3.
    pub fn tangent_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.tangents)
    }

    /// Flat bitangent view, stride 3.
    pub fn bitangent_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.bitangents)
    }

    /// Iterates triangles as corner-position triples, in storage order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.vertices.chunks_exact(3).map(|corners| {
            [
                Vector3::from(corners[0].position),
                Vector3::from(corners[1].position),
                Vector3::from(corners[2].position),
            ]
        })
    }
}

/// A mesh attached to a scene node: geometry plus material and the
/// user-toggled texture filtering state.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub geometry: MeshGeometry,
    pub material: Material,
    filter: FilterMode,
    revision: u64,
}

impl MeshNode {
    pub fn new(geometry: MeshGeometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            filter: FilterMode::Linear,
            revision: 0,
        }
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Switches texture filtering. Bumps the revision so an external
    /// renderer knows to re-realize its GPU textures with the new mode.
    pub fn set_filter(&mut self, filter: FilterMode) {
        if self.filter != filter {
            self.filter = filter;
            self.revision += 1;
        }
    }

    pub fn toggle_filter(&mut self) {
        let next = match self.filter {
            FilterMode::Linear => FilterMode::Nearest,
            FilterMode::Nearest => FilterMode::Linear,
        };
        self.set_filter(next);
    }

    /// Monotonic counter incremented on every filtering change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
