//! Mapping runtime
//!
//! Walks a compiled schema, resolves every field against the response and
//! collects the results as flattened entries.

use gemma_schema::{FieldSpec, Schema, SchemaNode};
use gemma_tree::Node;
use tracing::{debug, info};

use crate::assemble::assemble;
use crate::resolver::resolve;
use crate::transforms::coerce;

/// A flattened output value and the dotted path it is written to
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub path: String,
    pub value: Node,
}

impl Entry {
    /// Create an entry
    pub fn new(path: impl Into<String>, value: Node) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// Counters collected while executing a mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Leaf descriptors visited
    pub fields: usize,

    /// Fields that produced an entry
    pub emitted: usize,

    /// Fields skipped because nothing resolved and no default was set
    pub omitted: usize,
}

/// Result of executing a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutput {
    /// The assembled output document
    pub document: Node,

    /// Execution counters
    pub stats: MappingStats,
}

/// Runtime for executing schema mappings
#[derive(Debug, Default)]
pub struct MappingRuntime {
    stats: MappingStats,
}

impl MappingRuntime {
    /// Create a new mapping runtime
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `response` through `schema` into a nested output document
    pub fn execute(&mut self, schema: &Schema, response: &Node) -> MappingOutput {
        let entries = self.flatten(schema, response);
        let document = assemble(entries);

        info!(
            "Mapped {} of {} field(s), {} omitted",
            self.stats.emitted, self.stats.fields, self.stats.omitted
        );

        MappingOutput {
            document,
            stats: self.stats,
        }
    }

    /// Produce the flattened entries for `schema` in schema document order
    pub fn flatten(&mut self, schema: &Schema, response: &Node) -> Vec<Entry> {
        self.stats = MappingStats::default();
        let mut entries = Vec::new();
        self.flatten_node(&schema.root, response, "", &mut entries);
        entries
    }

    /// Counters of the last execution
    pub fn stats(&self) -> MappingStats {
        self.stats
    }

    fn flatten_node(
        &mut self,
        node: &SchemaNode,
        response: &Node,
        prefix: &str,
        entries: &mut Vec<Entry>,
    ) {
        match node {
            SchemaNode::Field(spec) => {
                self.stats.fields += 1;
                let path = prefix.trim_matches('.');
                match evaluate(spec, resolve(&spec.path, response)) {
                    Some(value) => {
                        self.stats.emitted += 1;
                        entries.push(Entry::new(path, value));
                    }
                    None => {
                        self.stats.omitted += 1;
                        debug!("No value for '{}' (path '{}'), omitting", path, spec.path);
                    }
                }
            }
            SchemaNode::Group(children) => {
                for (key, child) in children {
                    self.flatten_node(child, response, &format!("{prefix}{key}."), entries);
                }
            }
            SchemaNode::List(children) => {
                for (index, child) in children.iter().enumerate() {
                    self.flatten_node(child, response, &format!("{prefix}{index}."), entries);
                }
            }
            SchemaNode::Inert => {}
        }
    }
}

/// Decide the value a field emits, or `None` to omit it.
///
/// When nothing resolved the default stands in for the value; without a
/// default (or with a `null` one) the field is omitted. Whatever is emitted
/// is coerced to the declared type.
pub fn evaluate(spec: &FieldSpec, resolved: Option<&Node>) -> Option<Node> {
    let value = match resolved {
        Some(value) => value,
        None => {
            let default = spec.default.as_ref().filter(|default| !default.is_null())?;
            debug!("Using default {} for path '{}'", default, spec.path);
            default
        }
    };
    Some(coerce(value, spec))
}

/// Flattened entries for `schema` in schema document order
pub fn flatten(schema: &Schema, response: &Node) -> Vec<Entry> {
    MappingRuntime::new().flatten(schema, response)
}

/// Flatten and assemble in one call
pub fn map_document(schema: &Schema, response: &Node) -> Node {
    MappingRuntime::new().execute(schema, response).document
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemma_schema::{FieldType, SchemaLoader};
    use gemma_tree::parse_json;

    fn schema(json: &str) -> Schema {
        SchemaLoader::new().load_from_json(json).unwrap()
    }

    fn doc(json: &str) -> Node {
        parse_json(json).unwrap()
    }

    #[test]
    fn test_evaluate_resolved_value_is_coerced() {
        let spec = FieldSpec::new("n", FieldType::String);
        assert_eq!(
            evaluate(&spec, Some(&Node::integer(3))),
            Some(Node::string("3"))
        );
    }

    #[test]
    fn test_evaluate_absent_without_default_is_omitted() {
        let spec = FieldSpec::new("n", FieldType::String);
        assert_eq!(evaluate(&spec, None), None);
    }

    #[test]
    fn test_evaluate_absent_with_default_is_coerced() {
        let spec = FieldSpec::new("n", FieldType::String).with_default(7_i64);
        assert_eq!(evaluate(&spec, None), Some(Node::string("7")));

        let spec = FieldSpec::new("n", FieldType::Array).with_default("none");
        assert_eq!(evaluate(&spec, None), Some(Node::Sequence(vec![])));

        // A non-integer default is its own integer fallback.
        let spec = FieldSpec::new("n", FieldType::Integer).with_default("unknown");
        assert_eq!(evaluate(&spec, None), Some(Node::string("unknown")));
    }

    #[test]
    fn test_evaluate_well_typed_default_is_unchanged() {
        let spec = FieldSpec::new("n", FieldType::String).with_default("n/a");
        assert_eq!(evaluate(&spec, None), Some(Node::string("n/a")));

        let spec = FieldSpec::new("n", FieldType::Integer).with_default(-1_i64);
        assert_eq!(evaluate(&spec, None), Some(Node::integer(-1)));

        let spec = FieldSpec::new("n", FieldType::Array)
            .with_default(vec![Node::integer(1), Node::string("x")]);
        assert_eq!(
            evaluate(&spec, None),
            Some(Node::Sequence(vec![Node::integer(1), Node::string("x")]))
        );
    }

    #[test]
    fn test_evaluate_null_default_is_omitted() {
        let spec = FieldSpec::new("n", FieldType::Integer).with_default(Node::null());
        assert_eq!(evaluate(&spec, None), None);
    }

    #[test]
    fn test_flatten_order_and_paths() {
        let schema = schema(
            r#"{"properties": {
                "title": {"path": "t", "type": "string"},
                "missing": {"path": "nope", "type": "string"},
                "people": [
                    {"name": {"path": "p.0.n", "type": "string"}},
                    {"name": {"path": "p.1.n", "type": "string"}}
                ]
            }}"#,
        );
        let response = doc(r#"{"t": "T", "p": [{"n": "Ada"}, {"n": "Alan"}]}"#);

        let mut runtime = MappingRuntime::new();
        let entries = runtime.flatten(&schema, &response);

        assert_eq!(
            entries,
            vec![
                Entry::new("title", Node::string("T")),
                Entry::new("people.0.name", Node::string("Ada")),
                Entry::new("people.1.name", Node::string("Alan")),
            ]
        );
        assert_eq!(
            runtime.stats(),
            MappingStats {
                fields: 4,
                emitted: 3,
                omitted: 1
            }
        );
    }

    #[test]
    fn test_execute_builds_nested_output() {
        let schema = schema(
            r#"{"properties": {
                "header": {
                    "title": {"path": "doc.title", "type": "string"},
                    "pages": {"path": "doc.pages", "type": "integer", "default": -1}
                },
                "keywords": {"path": "doc.kw", "type": "array"}
            }}"#,
        );
        let response = doc(r#"{"doc": {"title": "T", "pages": "many", "kw": ["x", "y"]}}"#);

        let output = MappingRuntime::new().execute(&schema, &response);
        assert_eq!(
            output.document,
            doc(r#"{"header": {"title": "T", "pages": -1}, "keywords": ["x", "y"]}"#)
        );
        assert_eq!(output.stats.emitted, 3);
    }

    #[test]
    fn test_runtime_stats_reset_between_runs() {
        let schema = schema(r#"{"properties": {"a": {"path": "a", "type": "string"}}}"#);
        let mut runtime = MappingRuntime::new();

        runtime.execute(&schema, &doc(r#"{"a": "x"}"#));
        let second = runtime.execute(&schema, &doc(r#"{}"#));

        assert_eq!(
            second.stats,
            MappingStats {
                fields: 1,
                emitted: 0,
                omitted: 1
            }
        );
        assert_eq!(second.document, Node::empty_mapping());
    }

    #[test]
    fn test_map_document_with_root_level_field() {
        let schema = schema(r#"{"properties": {"path": "a", "type": "string"}}"#);
        let output = map_document(&schema, &doc(r#"{"a": "x"}"#));
        assert_eq!(output, doc(r#"{"": "x"}"#));
    }
}
