//! XML normalization options

use serde::Deserialize;

/// How XML constructs are named in the resulting tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct XmlConfig {
    /// Prefix prepended to attribute names (default: `@`)
    pub attribute_prefix: String,
    /// Key holding element text when the element also has attributes or
    /// children (default: `#text`)
    pub text_key: String,
    /// Keep namespace prefixes in element names, e.g. `tei:title` (default: true)
    pub keep_namespace_prefix: bool,
    /// Emit namespace declarations as `@xmlns` / `@xmlns:p` keys (default: true)
    pub keep_namespace_declarations: bool,
    /// Trim surrounding whitespace from text content (default: true)
    pub strip_whitespace: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: "@".to_string(),
            text_key: "#text".to_string(),
            keep_namespace_prefix: true,
            keep_namespace_declarations: true,
            strip_whitespace: true,
        }
    }
}

impl XmlConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute prefix
    pub fn attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribute_prefix = prefix.into();
        self
    }

    /// Set the text key
    pub fn text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = key.into();
        self
    }

    /// Configure namespace prefix handling
    pub fn keep_namespace_prefix(mut self, keep: bool) -> Self {
        self.keep_namespace_prefix = keep;
        self
    }

    /// Configure namespace declaration handling
    pub fn keep_namespace_declarations(mut self, keep: bool) -> Self {
        self.keep_namespace_declarations = keep;
        self
    }

    /// Configure whitespace stripping
    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }
}
