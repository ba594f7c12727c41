//! Error types for scene loading and picking.

use std::io;

use thiserror::Error;

/// Fatal errors surfaced by scene loading, asset resolution and picking.
///
/// Non-fatal import problems (malformed geometry lines, degenerate UV
/// triangles, ...) are *not* errors; they are reported as
/// [`crate::import::ImportIssue`] values alongside the parsed output.
#[derive(Debug, Error)]
pub enum SceneError {
    /// An asset or scene file could not be read from its source.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The scene document failed to deserialize. Missing required fields
    /// abort the scene load with this variant.
    #[error("malformed scene document: {0}")]
    Document(#[from] serde_json::Error),

    /// An asset referenced by the scene was not present in the source.
    #[error("asset not found: `{0}`")]
    AssetNotFound(String),

    /// A color literal was not a 6-digit hex string.
    #[error("invalid color literal `{0}`")]
    InvalidColor(String),

    /// A projection or view matrix could not be inverted for unprojection.
    /// Pick requests report this instead of producing a result.
    #[error("matrix is not invertible")]
    NonInvertibleMatrix,
}
