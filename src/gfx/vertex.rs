//! # Vertex Data Structures
//!
//! GPU-compatible vertex records for imported meshes. The interleaved
//! layout exposed to the renderer is `[px,py,pz, cr,cg,cb, nx,ny,nz]` per
//! face corner (stride 9 floats); UVs, tangents and bitangents live in
//! separate side buffers with one entry per corner in the same order.

/// One face corner of an imported mesh.
///
/// `#[repr(C)]` guarantees the C-compatible layout required for direct
/// upload into a GPU vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position [x, y, z].
    pub position: [f32; 3],
    /// Per-vertex fallback color [r, g, b], used when no diffuse texture
    /// is bound.
    pub color: [f32; 3],
    /// Normal [nx, ny, nz].
    pub normal: [f32; 3],
}

/// Floats per interleaved vertex record.
pub const VERTEX_STRIDE: usize = 9;
/// Floats per UV record.
pub const UV_STRIDE: usize = 2;
/// Floats per tangent or bitangent record.
pub const TANGENT_STRIDE: usize = 3;
