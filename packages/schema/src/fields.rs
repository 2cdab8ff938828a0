//! Field tree extracted from a schema, and the defaults it declares

use crate::document::SchemaDocument;
use formsync_codec::{FieldPath, Value};
use serde::Serialize;
use serde_json::Map;

/// Reference chains deeper than this are treated as unresolved
const MAX_REF_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    Primitive { ty: PrimitiveType },
    Object { fields: Vec<FieldNode> },
    Array { items: Box<FieldNode> },
    /// Map with dynamic keys sharing one value shape
    Record { values: Box<FieldNode> },
    Union { variants: Vec<FieldNode> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub name: String,
    pub path: FieldPath,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldNode {
    /// Field tree of a whole schema document
    pub fn from_schema(document: &SchemaDocument) -> Self {
        build(document, &document.root, String::new(), FieldPath::root(), true, 0)
    }
}

fn build(
    document: &SchemaDocument,
    schema: &Value,
    name: String,
    path: FieldPath,
    required: bool,
    depth: usize,
) -> FieldNode {
    let schema = deref(document, schema, depth);
    let description = schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    let default = schema.get("default").cloned();

    let kind = if let Some(variants) = schema
        .get("anyOf")
        .or_else(|| schema.get("oneOf"))
        .and_then(Value::as_array)
    {
        FieldKind::Union {
            variants: variants
                .iter()
                .enumerate()
                .map(|(i, variant)| {
                    build(document, variant, format!("{name}#{i}"), path.clone(), required, depth + 1)
                })
                .collect(),
        }
    } else {
        match schema_type(schema) {
            Some("object") => object_kind(document, schema, &path, depth),
            Some("array") => {
                let items = schema.get("items").unwrap_or(&Value::Bool(true));
                FieldKind::Array {
                    items: Box::new(build(document, items, "[]".into(), path.child(0usize), false, depth + 1)),
                }
            }
            other => FieldKind::Primitive {
                ty: primitive(other),
            },
        }
    };

    FieldNode {
        name,
        path,
        kind,
        default,
        required,
        description,
    }
}

fn object_kind(document: &SchemaDocument, schema: &Value, path: &FieldPath, depth: usize) -> FieldKind {
    let properties = schema.get("properties").and_then(Value::as_object);
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    match (properties, schema.get("additionalProperties")) {
        (None, Some(values)) if values.is_object() => FieldKind::Record {
            values: Box::new(build(document, values, "*".into(), path.child("*"), false, depth + 1)),
        },
        (properties, _) => FieldKind::Object {
            fields: properties
                .into_iter()
                .flatten()
                .map(|(key, child)| {
                    build(
                        document,
                        child,
                        key.clone(),
                        path.child(key.as_str()),
                        required.contains(&key.as_str()),
                        depth + 1,
                    )
                })
                .collect(),
        },
    }
}

fn deref<'a>(document: &'a SchemaDocument, mut schema: &'a Value, depth: usize) -> &'a Value {
    for _ in depth..MAX_REF_DEPTH {
        match schema
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| document.resolve_ref(reference))
        {
            Some(target) => schema = target,
            None => break,
        }
    }
    schema
}

fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type") {
        Some(Value::String(ty)) => Some(ty.as_str()),
        // ["string", "null"] style: the first non-null type wins
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .or(Some("null")),
        _ if schema.get("properties").is_some() => Some("object"),
        _ if schema.get("items").is_some() => Some("array"),
        _ => None,
    }
}

fn primitive(ty: Option<&str>) -> PrimitiveType {
    match ty {
        Some("string") => PrimitiveType::String,
        Some("integer") => PrimitiveType::Integer,
        Some("number") => PrimitiveType::Number,
        Some("boolean") => PrimitiveType::Boolean,
        Some("null") => PrimitiveType::Null,
        _ => PrimitiveType::Any,
    }
}

/// Read-only traversal of a field tree
///
/// Override a `visit_*` method to act on a node; call the matching `walk_*`
/// function to keep descending.
pub trait FieldVisitor: Sized {
    fn visit_field(&mut self, field: &FieldNode) {
        walk_field(self, field);
    }

    fn visit_primitive(&mut self, _field: &FieldNode, _ty: PrimitiveType) {}

    fn visit_object(&mut self, _field: &FieldNode, fields: &[FieldNode]) {
        for child in fields {
            self.visit_field(child);
        }
    }

    fn visit_array(&mut self, _field: &FieldNode, items: &FieldNode) {
        self.visit_field(items);
    }

    fn visit_record(&mut self, _field: &FieldNode, values: &FieldNode) {
        self.visit_field(values);
    }

    fn visit_union(&mut self, _field: &FieldNode, variants: &[FieldNode]) {
        for variant in variants {
            self.visit_field(variant);
        }
    }
}

pub fn walk_field<V: FieldVisitor>(visitor: &mut V, field: &FieldNode) {
    match &field.kind {
        FieldKind::Primitive { ty } => visitor.visit_primitive(field, *ty),
        FieldKind::Object { fields } => visitor.visit_object(field, fields),
        FieldKind::Array { items } => visitor.visit_array(field, items),
        FieldKind::Record { values } => visitor.visit_record(field, values),
        FieldKind::Union { variants } => visitor.visit_union(field, variants),
    }
}

/// The value tree implied by the defaults in a field tree
///
/// An explicit default wins over anything nested below it. Objects collect
/// the defaults of their properties and are omitted when none exist, except
/// at the root, which is always an object. Array items, record values and
/// union variants contribute nothing.
pub fn default_values(root: &FieldNode) -> Value {
    let mut collector = DefaultsCollector::default();
    collector.visit_field(root);
    match collector.value {
        Some(value) => value,
        None => Value::Object(Map::new()),
    }
}

#[derive(Default)]
struct DefaultsCollector {
    value: Option<Value>,
}

impl FieldVisitor for DefaultsCollector {
    fn visit_field(&mut self, field: &FieldNode) {
        self.value = field.default.clone();
        if self.value.is_none() {
            walk_field(self, field);
        }
    }

    fn visit_object(&mut self, _field: &FieldNode, fields: &[FieldNode]) {
        let mut map = Map::new();
        for child in fields {
            self.visit_field(child);
            if let Some(value) = self.value.take() {
                map.insert(child.name.clone(), value);
            }
        }
        self.value = (!map.is_empty()).then_some(Value::Object(map));
    }

    fn visit_array(&mut self, _field: &FieldNode, _items: &FieldNode) {}

    fn visit_record(&mut self, _field: &FieldNode, _values: &FieldNode) {}

    fn visit_union(&mut self, _field: &FieldNode, _variants: &[FieldNode]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> SchemaDocument {
        SchemaDocument::new(
            "s.json",
            json!({
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "description": "Display name"},
                    "config": {
                        "type": "object",
                        "properties": {
                            "host": {"type": "string", "default": "localhost"},
                            "port": {"$ref": "#/$defs/port"}
                        }
                    },
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "env": {"type": "object", "additionalProperties": {"type": "string"}},
                    "mode": {"anyOf": [{"type": "string"}, {"type": "integer"}]},
                    "retries": {"type": ["integer", "null"], "default": 3}
                },
                "$defs": {"port": {"type": "integer", "default": 8080}}
            }),
        )
    }

    #[test]
    fn test_field_kinds() {
        let root = FieldNode::from_schema(&document());
        let FieldKind::Object { fields } = &root.kind else {
            panic!("root should be an object");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "config", "tags", "env", "mode", "retries"]);

        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(fields[0].description.as_deref(), Some("Display name"));
        assert!(matches!(fields[2].kind, FieldKind::Array { .. }));
        assert!(matches!(fields[3].kind, FieldKind::Record { .. }));
        assert!(matches!(&fields[4].kind, FieldKind::Union { variants } if variants.len() == 2));
        assert!(matches!(
            fields[5].kind,
            FieldKind::Primitive { ty: PrimitiveType::Integer }
        ));
    }

    #[test]
    fn test_paths_follow_nesting() {
        let root = FieldNode::from_schema(&document());
        let FieldKind::Object { fields } = &root.kind else {
            panic!("root should be an object");
        };
        let FieldKind::Object { fields: config } = &fields[1].kind else {
            panic!("config should be an object");
        };
        assert_eq!(config[1].path, "config.port");
        assert!(matches!(
            config[1].kind,
            FieldKind::Primitive { ty: PrimitiveType::Integer }
        ));
        let FieldKind::Array { items } = &fields[2].kind else {
            panic!("tags should be an array");
        };
        assert_eq!(items.path, "tags[0]");
    }

    #[test]
    fn test_default_values() {
        let root = FieldNode::from_schema(&document());
        assert_eq!(
            default_values(&root),
            json!({"config": {"host": "localhost", "port": 8080}, "retries": 3})
        );
    }

    #[test]
    fn test_default_values_of_empty_schema() {
        let root = FieldNode::from_schema(&SchemaDocument::new("s.json", json!(true)));
        assert_eq!(default_values(&root), json!({}));
    }

    #[test]
    fn test_self_referencing_schema_terminates() {
        let doc = SchemaDocument::new("s.json", json!({"$ref": "#"}));
        let root = FieldNode::from_schema(&doc);
        assert!(matches!(root.kind, FieldKind::Primitive { ty: PrimitiveType::Any }));
    }

    #[test]
    fn test_visitor_counts_primitives() {
        struct Counter(usize);
        impl FieldVisitor for Counter {
            fn visit_primitive(&mut self, _field: &FieldNode, _ty: PrimitiveType) {
                self.0 += 1;
            }
        }
        let mut counter = Counter(0);
        counter.visit_field(&FieldNode::from_schema(&document()));
        // name, host, port, tags[], env values, two union variants, retries
        assert_eq!(counter.0, 8);
    }
}
