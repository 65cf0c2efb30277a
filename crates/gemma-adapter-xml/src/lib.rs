//! # gemma-adapter-xml
//!
//! XML adapter for mapping responses.
//!
//! XML documents are normalized into the generic tree so the mapping engine
//! can address them with the same dotted paths as JSON documents.
//!
//! ## Example Usage
//!
//! ```rust
//! use gemma_adapter_xml::{XmlConfig, XmlReader};
//!
//! let reader = XmlReader::with_config(XmlConfig::new().attribute_prefix("@"));
//! let tree = reader.parse_str(r#"<book id="1"><title>Odyssey</title></book>"#).unwrap();
//!
//! assert_eq!(tree.get("book").and_then(|b| b.get("@id")).and_then(|id| id.as_str()), Some("1"));
//! ```

pub mod config;
pub mod errors;
pub mod reader;

pub use config::XmlConfig;
pub use errors::{XmlError, XmlResult};
pub use reader::{XmlReader, parse_xml};

pub use errors::XmlError as Error;
pub type Result<T> = XmlResult<T>;
