//! Error types for the XML adapter

use thiserror::Error;

/// Errors that can occur when reading XML
#[derive(Error, Debug)]
pub enum XmlError {
    /// Malformed XML
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O failure while reading the source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XmlError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Result type for XML operations
pub type XmlResult<T> = std::result::Result<T, XmlError>;
