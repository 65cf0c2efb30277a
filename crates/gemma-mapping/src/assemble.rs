//! Reassembly of flattened entries into a nested output document

use crate::runtime::Entry;
use gemma_tree::{Mapping, Node};
use tracing::{debug, warn};

/// Build a nested mapping from `(dotted path, value)` entries.
///
/// Entries are applied in order. A top-level key keeps the first value
/// written to it; deeper keys are merged into shared intermediate mappings
/// and their last segment is overwritten by later entries. An entry whose
/// intermediate key already holds a non-mapping value is dropped.
pub fn assemble(entries: Vec<Entry>) -> Node {
    let mut root = Mapping::new();
    for entry in entries {
        insert_entry(&mut root, &entry.path, entry.value);
    }
    Node::Mapping(root)
}

fn insert_entry(root: &mut Mapping, path: &str, value: Node) {
    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    if parents.is_empty() {
        if root.contains_key(*last) {
            debug!("Key '{}' already set, keeping the first value", last);
        } else {
            root.insert((*last).to_string(), value);
        }
        return;
    }

    let mut current = root;
    for segment in parents {
        let child = current
            .entry((*segment).to_string())
            .or_insert_with(Node::empty_mapping);
        match child {
            Node::Mapping(map) => current = map,
            other => {
                warn!(
                    "Cannot place '{}': '{}' already holds a {}",
                    path,
                    segment,
                    other.kind()
                );
                return;
            }
        }
    }
    current.insert((*last).to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemma_tree::parse_json;

    fn entry(path: &str, value: Node) -> Entry {
        Entry::new(path, value)
    }

    #[test]
    fn test_single_level_entries() {
        let output = assemble(vec![
            entry("title", Node::string("Odyssey")),
            entry("year", Node::integer(1614)),
        ]);
        assert_eq!(output, parse_json(r#"{"title": "Odyssey", "year": 1614}"#).unwrap());
    }

    #[test]
    fn test_nested_entries_merge() {
        let output = assemble(vec![
            entry("author.name", Node::string("Homer")),
            entry("author.born", Node::string("unknown")),
            entry("ids.0", Node::string("a")),
            entry("ids.1", Node::string("b")),
        ]);
        assert_eq!(
            output,
            parse_json(
                r#"{"author": {"name": "Homer", "born": "unknown"}, "ids": {"0": "a", "1": "b"}}"#
            )
            .unwrap()
        );
    }

    #[test]
    fn test_top_level_first_write_wins() {
        let output = assemble(vec![
            entry("title", Node::string("first")),
            entry("title", Node::string("second")),
        ]);
        assert_eq!(output.get("title"), Some(&Node::string("first")));
    }

    #[test]
    fn test_nested_last_write_wins() {
        let output = assemble(vec![
            entry("a.b", Node::string("first")),
            entry("a.b", Node::string("second")),
        ]);
        assert_eq!(output.get("a").unwrap().get("b"), Some(&Node::string("second")));
    }

    #[test]
    fn test_scalar_blocks_deeper_path() {
        let output = assemble(vec![
            entry("a", Node::string("flat")),
            entry("a.b", Node::string("nested")),
        ]);
        assert_eq!(output, parse_json(r#"{"a": "flat"}"#).unwrap());
    }

    #[test]
    fn test_top_level_key_after_nested_is_kept_nested() {
        let output = assemble(vec![
            entry("a.b", Node::integer(1)),
            entry("a", Node::integer(2)),
        ]);
        assert_eq!(output, parse_json(r#"{"a": {"b": 1}}"#).unwrap());
    }

    #[test]
    fn test_output_key_order_follows_entries() {
        let output = assemble(vec![
            entry("z", Node::integer(1)),
            entry("m.x", Node::integer(2)),
            entry("a", Node::integer(3)),
        ]);
        let keys: Vec<&str> = output.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "m", "a"]);
    }

    #[test]
    fn test_empty_entries() {
        assert_eq!(assemble(Vec::new()), Node::empty_mapping());
    }
}
