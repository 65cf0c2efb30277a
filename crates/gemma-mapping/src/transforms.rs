//! Type coercions applied to resolved values
//!
//! Coercion never fails: a value that does not fit the declared type is
//! replaced by a fallback (default, `0` or an empty list).

use gemma_schema::{FieldSpec, FieldType};
use gemma_tree::{Node, Value};
use tracing::debug;

/// Coerce a resolved value to the field's declared type
pub fn coerce(value: &Node, spec: &FieldSpec) -> Node {
    match spec.field_type {
        FieldType::String => coerce_string(value),
        FieldType::Integer => coerce_integer(value, spec.default.as_ref()),
        FieldType::Array => coerce_array(value, spec.include.as_deref()),
    }
}

/// Stringify a value.
///
/// Strings pass through, other scalars and mappings become their text form,
/// and sequences keep their shape with every non-string element stringified.
pub fn coerce_string(value: &Node) -> Node {
    match value {
        Node::Scalar(Value::String(_)) => value.clone(),
        Node::Sequence(items) => Node::Sequence(items.iter().map(stringify_element).collect()),
        other => {
            debug!("Casting {} to string", other.kind());
            Node::string(other.to_text())
        }
    }
}

fn stringify_element(item: &Node) -> Node {
    match item {
        Node::Scalar(Value::String(_)) => item.clone(),
        other => Node::string(other.to_text()),
    }
}

/// Keep integral numbers; anything else becomes `default`, or `0` without one
pub fn coerce_integer(value: &Node, default: Option<&Node>) -> Node {
    if value.is_integer() {
        return value.clone();
    }

    match default {
        Some(default) => {
            debug!("{} is no integer, applying default {}", value.kind(), default);
            default.clone()
        }
        None => {
            debug!("{} is no integer and no default is set, using 0", value.kind());
            Node::integer(0)
        }
    }
}

/// Keep sequences, optionally filtering mapping elements down to `include`;
/// anything else becomes an empty sequence
pub fn coerce_array(value: &Node, include: Option<&[String]>) -> Node {
    match (value, include) {
        (Node::Sequence(items), Some(keys)) => Node::Sequence(filter_fields(items, keys)),
        (Node::Sequence(_), None) => value.clone(),
        (other, _) => {
            debug!("{} is no list, using an empty list", other.kind());
            Node::Sequence(Vec::new())
        }
    }
}

/// Drop keys not listed in `include` from every mapping element.
///
/// Non-mapping elements pass through untouched; mapping elements keep their
/// own key order.
pub fn filter_fields(items: &[Node], include: &[String]) -> Vec<Node> {
    items
        .iter()
        .map(|item| match item {
            Node::Mapping(map) => Node::Mapping(
                map.iter()
                    .filter(|(key, _)| include.iter().any(|wanted| wanted == *key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        })
        .collect()
}
