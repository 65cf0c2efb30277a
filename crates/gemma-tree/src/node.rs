//! Node types for the generic document tree

use indexmap::IndexMap;
use std::fmt;

/// Insertion-ordered mapping of keys to child nodes.
///
/// Order matters: schema traversal order decides which value wins when two
/// output paths collide, and output documents keep the schema's key order.
pub type Mapping = IndexMap<String, Node>;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Key/value container (JSON object, XML element with children)
    Mapping(Mapping),

    /// Ordered list of nodes (JSON array, repeated XML elements)
    Sequence(Vec<Node>),

    /// Leaf value
    Scalar(Value),
}

/// Scalar values that can be stored in leaf nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value
    String(String),

    /// Number value, kept lossless so integers and floats round-trip unchanged
    Number(serde_json::Number),

    /// Boolean value
    Boolean(bool),

    /// Null value; the tree's representation of "absent"
    Null,
}

/// Coarse node classification, used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    String,
    Number,
    Boolean,
    Null,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl Node {
    /// Create a null node
    pub fn null() -> Self {
        Node::Scalar(Value::Null)
    }

    /// Create an empty mapping node
    pub fn empty_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    /// Create a string node
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Value::String(value.into()))
    }

    /// Create an integer node
    pub fn integer(value: i64) -> Self {
        Node::Scalar(Value::Number(value.into()))
    }

    /// Create a float node; non-finite values become null
    pub fn float(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(|n| Node::Scalar(Value::Number(n)))
            .unwrap_or_else(Node::null)
    }

    /// Build a mapping node from key/value pairs, keeping their order
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get the node kind
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Scalar(Value::String(_)) => NodeKind::String,
            Node::Scalar(Value::Number(_)) => NodeKind::Number,
            Node::Scalar(Value::Boolean(_)) => NodeKind::Boolean,
            Node::Scalar(Value::Null) => NodeKind::Null,
        }
    }

    /// Check if the node is null
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Value::Null))
    }

    /// Check if the node is the empty string
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Node::Scalar(Value::String(s)) if s.is_empty())
    }

    /// Check if the node is an integral number (booleans and floats are not)
    pub fn is_integer(&self) -> bool {
        matches!(self, Node::Scalar(Value::Number(n)) if n.is_i64() || n.is_u64())
    }

    /// Borrow as mapping
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as mutable mapping
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as sequence
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get integral value if the node holds one that fits in `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Value::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Look up a key if the node is a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Render the node as text.
    ///
    /// Strings are returned as-is, other scalars use their JSON spelling and
    /// containers are rendered as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Node::Scalar(Value::String(s)) => s.clone(),
            Node::Scalar(Value::Number(n)) => n.to_string(),
            Node::Scalar(Value::Boolean(b)) => b.to_string(),
            Node::Scalar(Value::Null) => "null".to_string(),
            Node::Mapping(_) | Node::Sequence(_) => serde_json::Value::from(self).to_string(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::integer(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Value::Boolean(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(Node::null().kind(), NodeKind::Null);
        assert_eq!(Node::string("x").kind(), NodeKind::String);
        assert_eq!(Node::integer(3).kind(), NodeKind::Number);
        assert_eq!(Node::from(true).kind(), NodeKind::Boolean);
        assert_eq!(Node::Sequence(vec![]).kind(), NodeKind::Sequence);
        assert_eq!(Node::empty_mapping().kind(), NodeKind::Mapping);
        assert_eq!(NodeKind::Sequence.to_string(), "sequence");
    }

    #[test]
    fn test_integer_detection() {
        assert!(Node::integer(-7).is_integer());
        assert!(!Node::float(7.5).is_integer());
        assert!(!Node::from(true).is_integer());
        assert!(!Node::string("7").is_integer());
    }

    #[test]
    fn test_float_non_finite_becomes_null() {
        assert!(Node::float(f64::NAN).is_null());
    }

    #[test]
    fn test_empty_string_detection() {
        assert!(Node::string("").is_empty_string());
        assert!(!Node::string(" ").is_empty_string());
        assert!(!Node::null().is_empty_string());
    }

    #[test]
    fn test_mapping_preserves_insertion_order() {
        let node = Node::mapping([
            ("zeta", Node::integer(1)),
            ("alpha", Node::integer(2)),
            ("mid", Node::integer(3)),
        ]);

        let keys: Vec<&str> = node
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(node.get("alpha"), Some(&Node::integer(2)));
        assert_eq!(node.get("missing"), None);
    }

    #[test]
    fn test_get_on_non_mapping_is_none() {
        assert_eq!(Node::string("abc").get("a"), None);
        assert_eq!(Node::Sequence(vec![Node::null()]).get("0"), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Node::string("plain").to_text(), "plain");
        assert_eq!(Node::integer(42).to_text(), "42");
        assert_eq!(Node::float(1.5).to_text(), "1.5");
        assert_eq!(Node::from(false).to_text(), "false");
        assert_eq!(Node::null().to_text(), "null");
        assert_eq!(
            Node::mapping([("a", Node::integer(1)), ("b", Node::string("x"))]).to_text(),
            r#"{"a":1,"b":"x"}"#
        );
        assert_eq!(
            Node::Sequence(vec![Node::integer(1), Node::string("two")]).to_text(),
            r#"[1,"two"]"#
        );
    }
}
