use crate::error::{SchemaLoadError, SchemaResult};
use formsync_codec::{parse, Format, Value};
use std::path::Path;

/// A loaded schema, handed opaquely to the validator
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub url: String,
    pub root: Value,
}

impl SchemaDocument {
    pub fn new(url: impl Into<String>, root: Value) -> Self {
        Self {
            url: url.into(),
            root,
        }
    }

    /// Parse schema text fetched from `url`
    ///
    /// The format follows the URL's extension; anything other than a
    /// `.yaml`/`.yml` file is read as flow text.
    pub fn from_text(url: &str, text: &str) -> SchemaResult<Self> {
        let format = url_format(url);
        let root = parse(text, format).map_err(|source| SchemaLoadError::Parse {
            url: url.to_string(),
            source,
        })?;
        if !(root.is_object() || root.is_boolean()) {
            return Err(SchemaLoadError::NotASchema {
                url: url.to_string(),
            });
        }
        Ok(Self::new(url, root))
    }

    /// Resolve a local `#/...` reference against this document
    pub fn resolve_ref(&self, reference: &str) -> Option<&Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(&self.root);
        }
        self.root.pointer(pointer)
    }

    pub fn title(&self) -> Option<&str> {
        self.root.get("title").and_then(Value::as_str)
    }
}

fn url_format(url: &str) -> Format {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    Format::from_path(Path::new(path)).unwrap_or(Format::Flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_flow_text() {
        let doc = SchemaDocument::from_text("schema.json", r#"{"title": "App", "type": "object"}"#).unwrap();
        assert_eq!(doc.title(), Some("App"));
    }

    #[test]
    fn test_from_structured_text() {
        let doc = SchemaDocument::from_text(
            "https://example.com/schema.yaml?v=2",
            "type: object\nproperties:\n  name:\n    type: string\n",
        )
        .unwrap();
        assert_eq!(doc.root["properties"]["name"], json!({"type": "string"}));
    }

    #[test]
    fn test_rejects_scalar_schema() {
        let err = SchemaDocument::from_text("s.json", "42").unwrap_err();
        assert!(matches!(err, SchemaLoadError::NotASchema { .. }));
        let err = SchemaDocument::from_text("s.json", "{").unwrap_err();
        assert!(matches!(err, SchemaLoadError::Parse { .. }));
        assert_eq!(err.url(), "s.json");
    }

    #[test]
    fn test_resolve_ref() {
        let doc = SchemaDocument::new(
            "s.json",
            json!({"$defs": {"port": {"type": "integer"}}}),
        );
        assert_eq!(doc.resolve_ref("#/$defs/port"), Some(&json!({"type": "integer"})));
        assert_eq!(doc.resolve_ref("#"), Some(&doc.root));
        assert_eq!(doc.resolve_ref("other.json#/x"), None);
    }
}
