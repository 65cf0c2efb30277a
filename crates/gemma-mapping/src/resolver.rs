//! Dotted path resolution against a response document

use gemma_tree::Node;
use tracing::trace;

/// Resolve a dotted path such as `TEI.teiHeader.fileDesc.title` in `document`.
///
/// Each segment is looked up as a key in mappings or as an index in
/// sequences. Nothing here fails: a missing key, a bad index or a scalar in
/// the middle of the path all make the result absent. A `null` at the end
/// of the path is reported as absent as well.
///
/// Sequence segments are parsed as integers; an unparsable segment reads
/// index 0, negative indices count from the end and an out-of-range index
/// falls back to the first element.
pub fn resolve<'a>(path: &str, document: &'a Node) -> Option<&'a Node> {
    let mut current = Some(document);

    for segment in path.split('.') {
        // A missing key leaves `current` empty and every later segment stops here.
        let node = match current {
            Some(node) if !node.is_null() && !node.is_empty_string() => node,
            _ => {
                trace!("Nothing to descend into at '{}' of path '{}'", segment, path);
                return None;
            }
        };
        current = step(node, segment);
    }

    match current {
        Some(node) if !node.is_null() => {
            trace!("Resolved '{}' to {}", path, node.kind());
            Some(node)
        }
        _ => {
            trace!("Nothing found at '{}'", path);
            None
        }
    }
}

fn step<'a>(node: &'a Node, segment: &str) -> Option<&'a Node> {
    match node {
        Node::Mapping(map) => map.get(segment),
        Node::Sequence(items) => index_sequence(items, segment),
        Node::Scalar(_) => {
            trace!("Cannot look up '{}' in a {}", segment, node.kind());
            None
        }
    }
}

fn index_sequence<'a>(items: &'a [Node], segment: &str) -> Option<&'a Node> {
    let requested = segment.trim().parse::<i64>().unwrap_or_else(|_| {
        trace!("Segment '{}' is no index, using index 0", segment);
        0
    });

    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let position = if requested < 0 {
        requested + len
    } else {
        requested
    };

    usize::try_from(position)
        .ok()
        .and_then(|index| items.get(index))
        .or_else(|| {
            trace!("Index {} out of range for {} item(s), trying index 0", requested, len);
            items.first()
        })
}
