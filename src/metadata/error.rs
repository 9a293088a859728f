//! Error types for embedded resource indices.

use thiserror::Error;

/// Errors raised while decoding an `!AvaloniaResources` blob.
///
/// The converter logs these and leaves the library's resource index empty.
#[derive(Debug, Error)]
pub enum ResourceIndexError {
    /// IO error while reading the resource stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob ended before a declared length.
    #[error("Resource index truncated at byte {0}")]
    Truncated(usize),

    /// A length or offset field was negative.
    #[error("Negative length {0} in resource index")]
    NegativeLength(i32),

    /// Unknown index format version.
    #[error("Unsupported resource index version: {0}")]
    UnsupportedVersion(i32),

    /// A path was not valid UTF-8.
    #[error("Invalid UTF-8 in resource path")]
    InvalidUtf8,

    /// XML index or XAML info document could not be read.
    #[error("XML error: {0}")]
    Xml(String),
}

impl ResourceIndexError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}
