//! XML reader
//!
//! Converts an XML document into a tree the way `xmltodict` does: the root
//! element becomes the single top-level key, attributes and namespace
//! declarations become prefixed keys, repeated sibling elements collapse
//! into a sequence and text-only elements become plain strings.

use crate::config::XmlConfig;
use crate::errors::{XmlError, XmlResult};
use gemma_tree::{Mapping, Node};
use std::path::Path;
use tracing::trace;
use xml::attribute::OwnedAttribute;
use xml::name::OwnedName;
use xml::namespace::{NS_EMPTY_URI, NS_NO_PREFIX, NS_XML_PREFIX, NS_XMLNS_PREFIX, Namespace};
use xml::reader::{ParserConfig, XmlEvent};

/// Reader for XML documents
#[derive(Debug, Clone, Default)]
pub struct XmlReader {
    config: XmlConfig,
}

/// An element whose end tag has not been seen yet
struct OpenElement {
    key: String,
    namespace: Namespace,
    map: Mapping,
    text: String,
}

impl XmlReader {
    /// Create a reader with default naming conventions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with the given configuration
    pub fn with_config(config: XmlConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &XmlConfig {
        &self.config
    }

    /// Parse XML text into a tree
    pub fn parse_str(&self, xml: &str) -> XmlResult<Node> {
        let parser = ParserConfig::new().create_reader(xml.as_bytes());
        let mut open: Vec<OpenElement> = Vec::new();
        let mut document = Mapping::new();

        for event in parser {
            match event.map_err(|e| XmlError::parse(e.to_string()))? {
                XmlEvent::StartElement {
                    name,
                    attributes,
                    namespace,
                } => {
                    let map = self.attribute_map(&attributes, &namespace, open.last());
                    open.push(OpenElement {
                        key: self.qualified_name(&name),
                        namespace,
                        map,
                        text: String::new(),
                    });
                }
                XmlEvent::EndElement { .. } => {
                    let Some(element) = open.pop() else {
                        return Err(XmlError::parse("unbalanced end tag"));
                    };
                    let key = element.key.clone();
                    let value = self.finish_element(element);
                    match open.last_mut() {
                        Some(parent) => push_child(&mut parent.map, key, value),
                        None => {
                            trace!("Parsed XML root element '{}'", key);
                            document.insert(key, value);
                        }
                    }
                }
                XmlEvent::Characters(chunk) | XmlEvent::CData(chunk) => {
                    if let Some(element) = open.last_mut() {
                        element.text.push_str(&chunk);
                    }
                }
                XmlEvent::Whitespace(chunk) if !self.config.strip_whitespace => {
                    if let Some(element) = open.last_mut() {
                        element.text.push_str(&chunk);
                    }
                }
                _ => {}
            }
        }

        if document.is_empty() {
            return Err(XmlError::parse("document has no root element"));
        }
        Ok(Node::Mapping(document))
    }

    /// Read and parse an XML file
    pub fn read_file(&self, path: &Path) -> XmlResult<Node> {
        trace!("Reading XML from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// `prefix:local` when prefixes are kept, the local name otherwise
    fn qualified_name(&self, name: &OwnedName) -> String {
        match (&name.prefix, self.config.keep_namespace_prefix) {
            (Some(prefix), true) => format!("{}:{}", prefix, name.local_name),
            _ => name.local_name.clone(),
        }
    }

    /// Attributes and namespace declarations of an element, sorted by name
    fn attribute_map(
        &self,
        attributes: &[OwnedAttribute],
        namespace: &Namespace,
        parent: Option<&OpenElement>,
    ) -> Mapping {
        let mut named: Vec<(String, String)> = attributes
            .iter()
            .map(|attribute| (self.qualified_name(&attribute.name), attribute.value.clone()))
            .collect();

        if self.config.keep_namespace_declarations {
            named.extend(
                declared_namespaces(namespace, parent.map(|p| &p.namespace))
                    .map(|(prefix, uri)| match prefix {
                        NS_NO_PREFIX => (NS_XMLNS_PREFIX.to_string(), uri.to_string()),
                        prefix => (format!("{NS_XMLNS_PREFIX}:{prefix}"), uri.to_string()),
                    }),
            );
        }

        named.sort_by(|a, b| a.0.cmp(&b.0));
        named
            .into_iter()
            .map(|(name, value)| {
                (
                    format!("{}{}", self.config.attribute_prefix, name),
                    Node::string(value),
                )
            })
            .collect()
    }

    fn finish_element(&self, element: OpenElement) -> Node {
        let OpenElement { mut map, text, .. } = element;

        let text = if self.config.strip_whitespace {
            text.trim().to_string()
        } else {
            text
        };

        if map.is_empty() {
            return if text.is_empty() {
                Node::null()
            } else {
                Node::string(text)
            };
        }

        if !text.is_empty() {
            map.insert(self.config.text_key.clone(), Node::string(text));
        }
        Node::Mapping(map)
    }
}

/// Prefix bindings introduced by an element.
///
/// The parser reports every binding in scope; only those absent from or
/// different in the parent scope were declared here. The built-in `xml` and
/// `xmlns` prefixes and the empty default namespace are never reported.
fn declared_namespaces<'a>(
    scope: &'a Namespace,
    parent: Option<&'a Namespace>,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    scope.iter().filter(move |&(prefix, uri)| {
        let builtin = prefix == NS_XML_PREFIX
            || prefix == NS_XMLNS_PREFIX
            || (prefix == NS_NO_PREFIX && uri == NS_EMPTY_URI);
        !builtin && parent.and_then(|p| p.get(prefix)) != Some(uri)
    })
}

/// Insert a child element, turning repeated names into a sequence.
///
/// Element values are never sequences themselves, so an existing sequence
/// under `key` always stems from an earlier repetition.
fn push_child(map: &mut Mapping, key: String, value: Node) {
    match map.get_mut(&key) {
        Some(Node::Sequence(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Node::Sequence(vec![first, value]);
        }
        None => {
            map.insert(key, value);
        }
    }
}

/// Parse XML text with default conventions
pub fn parse_xml(xml: &str) -> XmlResult<Node> {
    XmlReader::new().parse_str(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemma_tree::parse_json;

    fn json(text: &str) -> Node {
        parse_json(text).unwrap()
    }

    #[test]
    fn test_text_only_elements_become_strings() {
        let node = parse_xml("<doc><title>Odyssey</title><year>1614</year></doc>").unwrap();
        assert_eq!(node, json(r#"{"doc": {"title": "Odyssey", "year": "1614"}}"#));
    }

    #[test]
    fn test_attributes_and_text() {
        let node = parse_xml(r#"<doc lang="grc"><title type="main">Odyssey</title></doc>"#).unwrap();
        assert_eq!(
            node,
            json(r##"{"doc": {"@lang": "grc", "title": {"@type": "main", "#text": "Odyssey"}}}"##)
        );
    }

    #[test]
    fn test_repeated_elements_become_sequence() {
        let node = parse_xml(
            "<doc><author>Homer</author><note>n</note><author>Pope</author><author>Butler</author></doc>",
        )
        .unwrap();
        assert_eq!(
            node,
            json(r#"{"doc": {"author": ["Homer", "Pope", "Butler"], "note": "n"}}"#)
        );
    }

    #[test]
    fn test_empty_elements_are_null() {
        let node = parse_xml("<doc><empty/><blank>   </blank></doc>").unwrap();
        assert_eq!(node, json(r#"{"doc": {"empty": null, "blank": null}}"#));
    }

    #[test]
    fn test_attribute_order_is_deterministic() {
        let node = parse_xml(r#"<doc z="1" a="2" m="3"/>"#).unwrap();
        let keys: Vec<&str> = node
            .get("doc")
            .unwrap()
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["@a", "@m", "@z"]);
    }

    #[test]
    fn test_namespace_prefix() {
        let xml = r#"<tei:TEI xmlns:tei="http://www.tei-c.org/ns/1.0"><tei:title>T</tei:title></tei:TEI>"#;

        let kept = parse_xml(xml).unwrap();
        assert_eq!(
            kept,
            json(r#"{"tei:TEI": {"@xmlns:tei": "http://www.tei-c.org/ns/1.0", "tei:title": "T"}}"#)
        );

        let stripped = XmlReader::with_config(
            XmlConfig::new()
                .keep_namespace_prefix(false)
                .keep_namespace_declarations(false),
        )
        .parse_str(xml)
        .unwrap();
        assert_eq!(stripped, json(r#"{"TEI": {"title": "T"}}"#));
    }

    #[test]
    fn test_qualified_attribute_names() {
        let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><text xml:lang="grc" xml:id="t1" n="1">x</text></TEI>"#;
        let node = parse_xml(xml).unwrap();

        let tei = node.get("TEI").unwrap();
        assert_eq!(tei.get("@xmlns"), Some(&Node::string("http://www.tei-c.org/ns/1.0")));
        assert_eq!(
            tei.get("text"),
            Some(&json(r##"{"@n": "1", "@xml:id": "t1", "@xml:lang": "grc", "#text": "x"}"##))
        );
    }

    #[test]
    fn test_same_local_name_with_different_prefixes() {
        let xml = r#"<a xmlns:x="urn:x" x:id="1" id="2"/>"#;
        let node = parse_xml(xml).unwrap();
        assert_eq!(
            node,
            json(r#"{"a": {"@id": "2", "@x:id": "1", "@xmlns:x": "urn:x"}}"#)
        );
    }

    #[test]
    fn test_namespace_declared_once() {
        let xml = r#"<a xmlns="urn:a"><b xmlns:p="urn:p"><c xmlns="urn:a">1</c></b></a>"#;
        let node = parse_xml(xml).unwrap();
        assert_eq!(
            node,
            json(r#"{"a": {"@xmlns": "urn:a", "b": {"@xmlns:p": "urn:p", "c": "1"}}}"#)
        );
    }

    #[test]
    fn test_whitespace_kept_when_not_stripping() {
        let reader = XmlReader::with_config(XmlConfig::new().strip_whitespace(false));
        let node = reader.parse_str("<a> x </a>").unwrap();
        assert_eq!(node.get("a"), Some(&Node::string(" x ")));
    }

    #[test]
    fn test_custom_naming() {
        let reader = XmlReader::with_config(XmlConfig::new().attribute_prefix("_").text_key("value"));
        let node = reader.parse_str(r#"<a id="7">x</a>"#).unwrap();
        assert_eq!(node, json(r#"{"a": {"_id": "7", "value": "x"}}"#));
    }

    #[test]
    fn test_comments_are_dropped() {
        let node = parse_xml("<a><!-- note --><b>1</b></a>").unwrap();
        assert_eq!(node, json(r#"{"a": {"b": "1"}}"#));
    }

    #[test]
    fn test_non_ascii_text() {
        let node = parse_xml("<a>Ἰλιάς</a>").unwrap();
        assert_eq!(node.get("a"), Some(&Node::string("Ἰλιάς")));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_xml("<a><b></a>").unwrap_err();
        assert!(matches!(err, XmlError::Parse(_)));
    }
}
