//! Conversion between trees and JSON text

use crate::node::{Mapping, Node, Value};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Node::Scalar(Value::Null),
            serde_json::Value::Bool(b) => Node::Scalar(Value::Boolean(b)),
            serde_json::Value::Number(n) => Node::Scalar(Value::Number(n)),
            serde_json::Value::String(s) => Node::Scalar(Value::String(s)),
            serde_json::Value::Array(items) => {
                Node::Sequence(items.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(object) => Node::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

impl From<&Node> for serde_json::Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Scalar(Value::Null) => serde_json::Value::Null,
            Node::Scalar(Value::Boolean(b)) => serde_json::Value::Bool(*b),
            Node::Scalar(Value::Number(n)) => serde_json::Value::Number(n.clone()),
            Node::Scalar(Value::String(s)) => serde_json::Value::String(s.clone()),
            Node::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Node::Mapping(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Node> for serde_json::Value {
    fn from(node: Node) -> Self {
        serde_json::Value::from(&node)
    }
}

/// Parse JSON text into a tree, keeping object key order
///
/// # Errors
///
/// Returns [`Error::Parse`] with line and column when the text is not valid JSON.
pub fn parse_json(text: &str) -> Result<Node> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::parse(e.line(), e.column(), e.to_string()))?;
    Ok(Node::from(value))
}

/// Pretty-print a tree as JSON using `indent` spaces per level.
///
/// Non-ASCII characters are written literally, not escaped.
///
/// # Errors
///
/// Returns [`Error::Serialize`] if the serializer fails.
pub fn to_json_string(node: &Node, indent: usize) -> Result<String> {
    let indent_bytes = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&indent_bytes);
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);

    serde_json::Value::from(node)
        .serialize(&mut serializer)
        .map_err(|e| Error::serialize(e.to_string()))?;

    String::from_utf8(buffer).map_err(|e| Error::serialize(e.to_string()))
}
