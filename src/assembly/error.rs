//! Error types for library loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening libraries or their embedded resources.
///
/// These never escape a metadata conversion: the converter logs them and
/// skips the offending library or resource.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// IO error while reading a library or resource file.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A library descriptor could not be decoded.
    #[error("Invalid library descriptor {path}: {message}")]
    Descriptor { path: PathBuf, message: String },

    /// A manifest resource is listed but its content is unavailable.
    #[error("Missing resource '{resource}' in library {library}")]
    MissingResource { library: String, resource: String },
}

impl AssemblyError {
    /// Create an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a descriptor decode error.
    pub fn descriptor(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing resource error.
    pub fn missing_resource(library: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::MissingResource {
            library: library.into(),
            resource: resource.into(),
        }
    }
}
