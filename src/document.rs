//! Permissive accessors over untyped YAML documents
//!
//! Lookups never fail: a non-mapping node, a missing key or a value of the
//! wrong shape all read as "not found".

use serde_yaml::{Mapping, Sequence, Value};

/// The `(apiVersion, kind)` pair a document is classified by
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationKey {
    pub api_version: String,
    pub kind: String,
}

impl ClassificationKey {
    /// Create a key from literal values
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }
}

/// Read the classification key from the top level of a document
pub fn classify(document: &Value) -> ClassificationKey {
    ClassificationKey::new(
        text_child(document, "apiVersion"),
        text_child(document, "kind"),
    )
}

/// String value of `name`, or `""` when absent or not a string
pub fn text_child<'a>(node: &'a Value, name: &str) -> &'a str {
    node.as_mapping()
        .and_then(|mapping| mapping.get(name))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Mutable mapping stored under `name`
pub fn mapping_child_mut<'a>(node: &'a mut Value, name: &str) -> Option<&'a mut Mapping> {
    node.as_mapping_mut()?.get_mut(name)?.as_mapping_mut()
}

/// Mutable sequence stored under `name`
pub fn sequence_child_mut<'a>(node: &'a mut Value, name: &str) -> Option<&'a mut Sequence> {
    node.as_mapping_mut()?.get_mut(name)?.as_sequence_mut()
}

/// Overwrite the string stored under `name` in a mapping
pub fn set_text(mapping: &mut Mapping, name: &str, value: String) {
    mapping.insert(Value::String(name.to_string()), Value::String(value));
}
