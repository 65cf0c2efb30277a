//! Schema model definitions

use gemma_tree::Node;
use std::fmt;
use std::str::FromStr;

/// Declared output type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Array,
}

impl FieldType {
    /// Schema spelling of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "array" => Ok(FieldType::Array),
            other => Err(format!(
                "unknown type '{other}' (expected string, integer or array)"
            )),
        }
    }
}

/// A leaf descriptor: where to read a value and how to cast it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Dotted source path into the response document
    pub path: String,

    /// Declared output type
    pub field_type: FieldType,

    /// Value used when the path resolves to nothing
    pub default: Option<Node>,

    /// Keys kept from mapping elements of an `array` field
    pub include: Option<Vec<String>>,
}

impl FieldSpec {
    /// Create a descriptor without default or include list
    pub fn new(path: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            path: path.into(),
            field_type,
            default: None,
            include: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Node>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the include list
    pub fn with_include<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(keys.into_iter().map(Into::into).collect());
        self
    }
}

/// A node of a compiled schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Leaf descriptor
    Field(FieldSpec),

    /// Keyed children, in document order
    Group(Vec<(String, SchemaNode)>),

    /// Indexed children
    List(Vec<SchemaNode>),

    /// Scalar in a non-leaf position; contributes nothing to the output
    Inert,
}

/// A field together with the output path it will be written to
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry<'a> {
    pub output_path: String,
    pub spec: &'a FieldSpec,
}

/// A compiled mapping schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub root: SchemaNode,
}

impl Schema {
    /// Wrap a compiled root node
    pub fn new(root: SchemaNode) -> Self {
        Self { root }
    }

    /// All fields in traversal order with their output paths
    pub fn fields(&self) -> Vec<FieldEntry<'_>> {
        let mut out = Vec::new();
        collect_fields(&self.root, "", &mut out);
        out
    }

    /// Number of leaf descriptors
    pub fn field_count(&self) -> usize {
        self.fields().len()
    }
}

fn collect_fields<'a>(node: &'a SchemaNode, prefix: &str, out: &mut Vec<FieldEntry<'a>>) {
    match node {
        SchemaNode::Field(spec) => out.push(FieldEntry {
            output_path: prefix.trim_matches('.').to_string(),
            spec,
        }),
        SchemaNode::Group(children) => {
            for (key, child) in children {
                collect_fields(child, &format!("{prefix}{key}."), out);
            }
        }
        SchemaNode::List(children) => {
            for (index, child) in children.iter().enumerate() {
                collect_fields(child, &format!("{prefix}{index}."), out);
            }
        }
        SchemaNode::Inert => {}
    }
}
