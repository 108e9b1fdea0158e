//! Field mapping module - the extracted contract values
//!
//! A mapping is produced once per extraction and read once per generate
//! action. Keys are field names exactly as the model returned them; they are
//! not checked against the catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Build the placeholder token for a field name: `{{name}}`
pub fn placeholder_token(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// The value extracted for one field
///
/// `Absent` is the explicit marker for a field the model reported as not
/// present in the contract (JSON `null`). It is never represented as the
/// string `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldValue {
    /// Text found in the contract
    Text(String),

    /// The field is not present in the contract
    Absent,
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whether this is the absent marker
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// The text, if present
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Absent => None,
        }
    }

    /// Render for substitution, using `null_text` for absent values
    pub fn render<'a>(&'a self, null_text: &'a str) -> &'a str {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Absent => null_text,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => FieldValue::Text(text),
            None => FieldValue::Absent,
        }
    }
}

impl From<FieldValue> for Option<String> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Some(text),
            FieldValue::Absent => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Field name → extracted value
///
/// Iteration is in key order, so anything derived from a mapping (prompt
/// echoes, table output, filled documents) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get the value for a field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Whether the mapping has a key for this field (absent values count)
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over (name, value) in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields carrying text
    pub fn present_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_absent()).count()
    }
}

impl FromIterator<(String, FieldValue)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FieldMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            match value {
                FieldValue::Text(text) => writeln!(f, "{}: {}", name, text)?,
                FieldValue::Absent => writeln!(f, "{}: (absent)", name)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_token() {
        assert_eq!(placeholder_token("Supplier Name"), "{{Supplier Name}}");
        assert_eq!(placeholder_token(""), "{{}}");
    }

    #[test]
    fn test_render_absent_uses_null_text() {
        assert_eq!(FieldValue::Absent.render(""), "");
        assert_eq!(FieldValue::Absent.render("N/A"), "N/A");
        assert_eq!(FieldValue::text("Acme").render("N/A"), "Acme");
    }

    #[test]
    fn test_mapping_serializes_absent_as_null() {
        let mut mapping = FieldMapping::new();
        mapping.insert("Supplier Name", "Acme Corp");
        mapping.insert("Payment Terms", FieldValue::Absent);

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"Payment Terms":null,"Supplier Name":"Acme Corp"}"#);
    }

    #[test]
    fn test_mapping_deserializes_null_as_absent() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"Penalties": null, "Penalties ": "none"}"#).unwrap();
        assert_eq!(mapping.get("Penalties"), Some(&FieldValue::Absent));
        assert_eq!(mapping.get("Penalties "), Some(&FieldValue::text("none")));
        assert_eq!(mapping.present_count(), 1);
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let mut mapping = FieldMapping::new();
        mapping.insert("b", "2");
        mapping.insert("a", "1");
        mapping.insert("c", FieldValue::Absent);

        let keys: Vec<_> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_display_marks_absent() {
        let mut mapping = FieldMapping::new();
        mapping.insert("Penalties", FieldValue::Absent);
        assert_eq!(mapping.to_string(), "Penalties: (absent)\n");
    }
}
