#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # gemma-tree
//!
//! Generic document tree used for mapping schemas, response documents and
//! mapping output.
//!
//! Every input format (JSON, XML, YAML) is normalized into the same tagged
//! union so the mapping engine can pattern-match on node kinds instead of
//! inspecting format-specific types.

/// JSON parsing and pretty-printing for trees.
pub mod json;
/// Core tree node model.
pub mod node;

/// JSON entry points.
pub use json::{parse_json, to_json_string};
/// Node primitives for tree structure and scalar typing.
pub use node::{Mapping, Node, NodeKind, Value};

use thiserror::Error;

/// Errors that can occur when reading or writing trees
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Build a parse error with source position.
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Build a serialization error.
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize(message.into())
    }
}

/// Crate-local result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
