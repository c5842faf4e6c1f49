//! Unified error handling for m3d
//!
//! One error type covers scene loading, mesh validation and export, so a
//! failed root can be reported with the same type regardless of where the
//! failure happened.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all m3d operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ==================== Scene Errors ====================

    /// Scene description could not be parsed
    #[error("Scene parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scene description is structurally invalid
    #[error("Invalid scene: {message}")]
    InvalidScene {
        message: String,
    },

    /// Object referenced by name or id does not exist
    #[error("Unknown object: {name}")]
    UnknownObject {
        name: String,
    },

    /// Image referenced by name or id does not exist
    #[error("Unknown image: {name}")]
    UnknownImage {
        name: String,
    },

    // ==================== Export Errors ====================

    /// Mesh payload violates an index or reference invariant
    #[error("Invalid mesh '{object}': {message}")]
    InvalidMesh {
        object: String,
        message: String,
    },

    /// Export of a root object failed
    #[error("Export of '{object}' failed: {message}")]
    ExportFailed {
        object: String,
        message: String,
    },

    // ==================== General Errors ====================

    /// Error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
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

    /// Create an invalid scene error
    pub fn invalid_scene(message: impl Into<String>) -> Self {
        Error::InvalidScene {
            message: message.into(),
        }
    }

    /// Create an invalid mesh error for the named object
    pub fn invalid_mesh(object: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidMesh {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound(_) | Error::UnknownObject { .. } | Error::UnknownImage { .. } => {
                true
            }
            Error::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error comes from bad input data rather than the environment
    pub fn is_data_error(&self) -> bool {
        match self {
            Error::Json(_)
            | Error::InvalidScene { .. }
            | Error::InvalidMesh { .. }
            | Error::UnknownObject { .. }
            | Error::UnknownImage { .. } => true,
            Error::WithContext { source, .. } => source.is_data_error(),
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
