//! # Mesh Import Pipeline
//!
//! Text-format importers: OBJ-family polygon meshes ([`obj`]), MTL-family
//! materials ([`mtl`]) and the JSON scene document ([`scene`]).
//!
//! Importers never abort on bad geometry lines. Every problem is recorded
//! as an [`ImportIssue`] and returned next to the parsed output (and logged
//! with `log::warn!`); parsing continues with the offending line skipped.
//! Only the scene document is strict: a missing required field is fatal.

pub mod mtl;
pub mod obj;
pub mod scene;

pub use mtl::{parse_mtl, MtlImport};
pub use obj::{parse_obj, ObjImport};
pub use scene::{build_scene, SceneDescription};

use thiserror::Error;

/// A non-fatal problem found while importing mesh or material text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportIssue {
    /// A line had the wrong token count or an unparseable number. The line
    /// was skipped.
    #[error("line {line}: malformed entry `{text}`")]
    MalformedLine { line: usize, text: String },

    /// A face referenced a position/texcoord/normal index outside the
    /// parsed data. The whole triangle was skipped.
    #[error("line {line}: face index out of range")]
    IndexOutOfRange { line: usize },

    /// A triangle's UV area was (near) zero; its tangent and bitangent
    /// were zeroed instead of propagating infinities.
    #[error("triangle {triangle}: degenerate UV area, tangent basis zeroed")]
    DegenerateUv { triangle: usize },

    /// A position index was paired with more than one normal index across
    /// faces. The importer keeps the last-seen pairing for every corner
    /// sharing that position, which flattens what was probably meant to be
    /// smooth shading. Surfaced so callers can decide whether to care.
    #[error("position {position} paired with {normals} distinct normals; last one wins")]
    NormalConflict { position: usize, normals: usize },
}
