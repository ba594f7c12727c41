// src/lib.rs
//! Trellis
//!
//! The geometric core of an interactive 3D scene viewer: a hierarchical
//! scene graph with composable transforms, an OBJ/MTL import pipeline that
//! produces GPU-ready interleaved buffers with per-face tangent bases, and
//! a ray-casting picker that resolves screen clicks to mesh nodes.
//!
//! Rendering, windowing and UI are external collaborators: they feed this
//! crate camera matrices, a viewport and selection events, and consume
//! world transforms, vertex buffers and pick results.

pub mod error;
pub mod gfx;
pub mod import;
pub mod loader;
pub mod prelude;
pub mod util;

// Re-export main types for convenience
pub use error::SceneError;
pub use gfx::Scene;
pub use loader::load_scene;
