//! Schema loader and descriptor validation

use crate::model::{FieldSpec, FieldType, Schema, SchemaNode};
use crate::{Error, Result};
use gemma_tree::{Node, Value};
use std::path::Path;
use tracing::{debug, info, trace};

/// Key holding the schema tree in a schema document
pub const DEFAULT_ROOT_KEY: &str = "properties";

const PATH_KEY: &str = "path";
const TYPE_KEY: &str = "type";
const DEFAULT_KEY: &str = "default";
const INCLUDE_KEY: &str = "include";

/// Loads schema documents and compiles them into [`Schema`] trees
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    root_key: String,
}

impl SchemaLoader {
    /// Create a loader reading the schema tree from `properties`
    pub fn new() -> Self {
        Self {
            root_key: DEFAULT_ROOT_KEY.to_string(),
        }
    }

    /// Read the schema tree from a different top-level key
    pub fn with_root_key(mut self, root_key: impl Into<String>) -> Self {
        self.root_key = root_key.into();
        self
    }

    /// Top-level key the schema tree is read from
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// Load a schema from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load_from_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load a schema from JSON text
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        let document = gemma_tree::parse_json(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;
        self.load_from_node(&document)
    }

    /// Load a schema from YAML text
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;
        self.load_from_node(&Node::from(value))
    }

    /// Compile the schema tree found under the root key of `document`
    pub fn load_from_node(&self, document: &Node) -> Result<Schema> {
        let tree = document
            .get(&self.root_key)
            .ok_or_else(|| Error::MissingRoot(self.root_key.clone()))?;

        let root = compile(tree, "")?;
        let schema = Schema::new(root);
        info!(
            "Loaded schema with {} field(s) from '{}'",
            schema.field_count(),
            self.root_key
        );
        Ok(schema)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a raw schema node. `prefix` is the dotted output path so far,
/// with a trailing separator.
pub fn compile(node: &Node, prefix: &str) -> Result<SchemaNode> {
    match node {
        Node::Mapping(map) if map.contains_key(PATH_KEY) && map.contains_key(TYPE_KEY) => {
            compile_field(node, prefix).map(SchemaNode::Field)
        }
        Node::Mapping(map) => {
            reject_partial_descriptor(node, prefix)?;
            let children = map
                .iter()
                .map(|(key, child)| Ok((key.clone(), compile(child, &format!("{prefix}{key}."))?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(SchemaNode::Group(children))
        }
        Node::Sequence(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(index, child)| compile(child, &format!("{prefix}{index}.")))
                .collect::<Result<Vec<_>>>()?;
            Ok(SchemaNode::List(children))
        }
        Node::Scalar(_) => {
            debug!("Ignoring scalar at '{}' in schema", location(prefix));
            Ok(SchemaNode::Inert)
        }
    }
}

fn compile_field(node: &Node, prefix: &str) -> Result<FieldSpec> {
    let at = location(prefix);

    let path = match node.get(PATH_KEY) {
        Some(Node::Scalar(Value::String(path))) => path.clone(),
        Some(other) => {
            return Err(Error::invalid_descriptor(
                at,
                format!("'path' must be a string, found {}", other.kind()),
            ));
        }
        None => return Err(Error::invalid_descriptor(at, "missing 'path'")),
    };

    let field_type = match node.get(TYPE_KEY) {
        Some(Node::Scalar(Value::String(name))) => name
            .parse::<FieldType>()
            .map_err(|reason| Error::invalid_descriptor(at.clone(), reason))?,
        Some(other) => {
            return Err(Error::invalid_descriptor(
                at,
                format!("'type' must be a string, found {}", other.kind()),
            ));
        }
        None => return Err(Error::invalid_descriptor(at, "missing 'type'")),
    };

    let include = match node.get(INCLUDE_KEY) {
        None => None,
        Some(Node::Sequence(items)) => Some(
            items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::invalid_descriptor(
                            at.clone(),
                            format!("'include' entries must be strings, found {}", item.kind()),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(other) => {
            return Err(Error::invalid_descriptor(
                at,
                format!("'include' must be a list of keys, found {}", other.kind()),
            ));
        }
    };

    if include.is_some() && field_type != FieldType::Array {
        debug!("'include' at '{}' has no effect on type {}", at, field_type);
    }

    trace!("Compiled field '{}' <- '{}' ({})", at, path, field_type);
    Ok(FieldSpec {
        path,
        field_type,
        default: node.get(DEFAULT_KEY).cloned(),
        include,
    })
}

/// A mapping carrying a scalar `path` or `type` without its partner is a
/// descriptor with a missing key, not a group.
fn reject_partial_descriptor(node: &Node, prefix: &str) -> Result<()> {
    let has_scalar = |key: &str| matches!(node.get(key), Some(Node::Scalar(_)));

    if has_scalar(PATH_KEY) {
        return Err(Error::invalid_descriptor(location(prefix), "missing 'type'"));
    }
    if has_scalar(TYPE_KEY) {
        return Err(Error::invalid_descriptor(location(prefix), "missing 'path'"));
    }
    Ok(())
}

fn location(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('.');
    if trimmed.is_empty() {
        "<root>".to_string()
    } else {
        trimmed.to_string()
    }
}
