//! FBX geometry exporter
//!
//! Writes mesh objects as ASCII FBX 7.4, the geometry format Source 2's
//! model compiler imports.

mod exporter;
mod writer;

pub use exporter::{axis_matrix, FbxExporter};
pub use writer::FbxWriter;

use thiserror::Error;

/// FBX version written in the header
pub const FBX_VERSION: u32 = 7400;

/// FBX export errors
#[derive(Debug, Error)]
pub enum FbxExportError {
    /// File could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mesh failed validation
    #[error("Invalid mesh data in '{object}': {message}")]
    InvalidMeshData {
        /// Object name
        object: String,
        /// What is wrong
        message: String,
    },

    /// Axis pair does not form a basis
    #[error("Forward axis {forward} and up axis {up} are not perpendicular")]
    InvalidAxes {
        /// Forward axis label
        forward: String,
        /// Up axis label
        up: String,
    },

    /// Option this writer cannot honor
    #[error("Unsupported option: {0}")]
    Unsupported(String),

    /// No mesh objects were given
    #[error("Nothing to export")]
    Empty,
}

impl From<FbxExportError> for cs2forge_core::Error {
    fn from(err: FbxExportError) -> Self {
        match err {
            FbxExportError::Io(e) => cs2forge_core::Error::Io(e),
            other => cs2forge_core::Error::export_failed(other.to_string()),
        }
    }
}

/// Result type for FBX export
pub type FbxResult<T> = Result<T, FbxExportError>;
