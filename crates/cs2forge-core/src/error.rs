//! Unified error handling for cs2forge
//!
//! This module provides the error type shared by the scene, export and
//! CLI layers. Crate-local error types convert into it.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all cs2forge operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Export destination is missing or not a directory
    #[error("Please select a valid directory. Got: {0}")]
    InvalidDestination(PathBuf),

    // ==================== Scene Errors ====================

    /// Material lookup failed
    #[error("Material not found: {name}")]
    MaterialNotFound {
        /// Material name
        name: String,
    },

    /// Image lookup failed
    #[error("Image not found: {name}")]
    ImageNotFound {
        /// Image name
        name: String,
    },

    /// Two scene items share a name that must be unique
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName {
        /// Item kind ("material", "image", "object")
        kind: &'static str,
        /// Conflicting name
        name: String,
    },

    /// Scene manifest could not be read
    #[error("Invalid scene manifest: {message}")]
    InvalidManifest {
        /// Description
        message: String,
    },

    /// Invalid data structure
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description
        message: String,
    },

    // ==================== Image Errors ====================

    /// Image decode, resize or encode failed
    #[error("Image error: {message}")]
    Image {
        /// Description
        message: String,
    },

    /// Image has unusable dimensions
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    // ==================== Export Errors ====================

    /// Export failed
    #[error("Export failed: {message}")]
    ExportFailed {
        /// Description
        message: String,
    },

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Error::InvalidData {
            message: message.into(),
        }
    }

    /// Create an image error
    pub fn image(message: impl Into<String>) -> Self {
        Error::Image {
            message: message.into(),
        }
    }

    /// Create an export failure
    pub fn export_failed(message: impl Into<String>) -> Self {
        Error::ExportFailed {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound(_)
            | Error::MaterialNotFound { .. }
            | Error::ImageNotFound { .. } => true,
            Error::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is the export precondition failure
    pub fn is_precondition(&self) -> bool {
        match self {
            Error::InvalidDestination(_) => true,
            Error::WithContext { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = Error::FileNotFound(PathBuf::from("/test"));
        let contextualized = err.with_context("while loading manifest");

        assert!(contextualized.to_string().contains("while loading manifest"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::FileNotFound(PathBuf::from("/test")).is_not_found());
        assert!(Error::ImageNotFound { name: "wood".into() }.is_not_found());
        assert!(!Error::invalid_data("boom").is_not_found());
    }

    #[test]
    fn test_precondition_survives_context() {
        let err = Error::InvalidDestination(PathBuf::from("/missing"))
            .with_context("export run");
        assert!(err.is_precondition());
        assert!(!Error::export_failed("fbx").is_precondition());
    }

    #[test]
    fn test_invalid_destination_message() {
        let err = Error::InvalidDestination(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Please select a valid directory. Got: /nope");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::FileNotFound(PathBuf::from("/test")));
        let with_context = result.context("loading data");

        assert!(with_context.is_err());
        assert!(with_context.unwrap_err().to_string().contains("loading data"));
    }
}
