//! # gemma-schema
//!
//! Mapping schema model and loader.
//!
//! A mapping schema is a tree whose leaves are field descriptors
//! (`{"path": "a.b", "type": "string"}`) and whose inner keys spell the
//! output document's shape. The loader validates descriptors up front so the
//! mapping engine never has to deal with a malformed leaf.

pub mod loader;
pub mod model;

pub use loader::SchemaLoader;
pub use model::{FieldEntry, FieldSpec, FieldType, Schema, SchemaNode};

use thiserror::Error;

/// Errors that can occur when loading schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema root key '{0}' not found")]
    MissingRoot(String),

    #[error("Invalid field descriptor at '{location}': {reason}")]
    InvalidDescriptor { location: String, reason: String },

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an invalid-descriptor error with its output location.
    pub fn invalid_descriptor(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
