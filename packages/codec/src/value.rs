//! Path-addressed reads and copy-on-write updates of the value tree

use crate::path::{FieldPath, Segment};
use serde_json::{Map, Value};

/// Look up the value at `path`
pub fn value_at<'a>(tree: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| match node {
            Value::Object(map) => map.get(&*segment.normalized()),
            Value::Array(items) => segment.as_index().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// A fresh tree equal to `tree` with `value` placed at `path`
///
/// Missing intermediate containers are created: a sequence when the segment
/// that addresses into it is numeric, a map otherwise. Scalars in the way are
/// replaced. Writing past the end of a sequence pads it with nulls.
pub fn with_value_at(tree: &Value, path: &FieldPath, value: Value) -> Value {
    let mut next = tree.clone();
    set_in_place(&mut next, path.segments(), value);
    next
}

/// A fresh tree equal to `tree` without the value at `path`
///
/// Removing from a sequence shifts the following items down. Returns the
/// unchanged copy when nothing lives at `path`.
pub fn without_value_at(tree: &Value, path: &FieldPath) -> Value {
    let mut next = tree.clone();
    if let Some((last, parents)) = path.segments().split_last() {
        if let Some(parent) = lookup_mut(&mut next, parents) {
            match parent {
                Value::Object(map) => {
                    map.shift_remove(&*last.normalized());
                }
                Value::Array(items) => {
                    if let Some(index) = last.as_index().filter(|i| *i < items.len()) {
                        items.remove(index);
                    }
                }
                _ => {}
            }
        }
    } else {
        next = Value::Null;
    }
    next
}

fn set_in_place(slot: &mut Value, segments: &[Segment], value: Value) {
    match segments.split_first() {
        None => *slot = value,
        Some((head, rest)) => set_in_place(child_slot(slot, head), rest, value),
    }
}

fn child_slot<'a>(slot: &'a mut Value, segment: &Segment) -> &'a mut Value {
    let index = segment.as_index();
    let wants_sequence = index.is_some() && !slot.is_object();

    if wants_sequence && !slot.is_array() {
        *slot = Value::Array(Vec::new());
    } else if !wants_sequence && !slot.is_object() {
        *slot = Value::Object(Map::new());
    }

    match (slot, index) {
        (Value::Array(items), Some(index)) => {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_key()).or_insert(Value::Null),
        (other, _) => other,
    }
}

fn lookup_mut<'a>(tree: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    segments
        .iter()
        .try_fold(tree, |node, segment| match node {
            Value::Object(map) => map.get_mut(&*segment.normalized()),
            Value::Array(items) => segment.as_index().and_then(move |i| items.get_mut(i)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    #[test]
    fn test_value_at() {
        let tree = json!({"config": {"ports": [80, 443]}});
        assert_eq!(value_at(&tree, &path("config.ports[1]")), Some(&json!(443)));
        assert_eq!(value_at(&tree, &path("config.ports.0")), Some(&json!(80)));
        assert_eq!(value_at(&tree, &path("config.missing")), None);
        assert_eq!(value_at(&tree, &FieldPath::root()), Some(&tree));
    }

    #[test]
    fn test_with_value_at_does_not_touch_original() {
        let tree = json!({"name": "a"});
        let next = with_value_at(&tree, &path("name"), json!("b"));
        assert_eq!(tree, json!({"name": "a"}));
        assert_eq!(next, json!({"name": "b"}));
    }

    #[test]
    fn test_with_value_at_creates_containers() {
        let tree = json!({});
        let next = with_value_at(&tree, &path("servers[1].host"), json!("db"));
        assert_eq!(next, json!({"servers": [null, {"host": "db"}]}));

        let next = with_value_at(&tree, &path("a.0.b"), json!(true));
        assert_eq!(next, json!({"a": [{"b": true}]}));
    }

    #[test]
    fn test_with_value_at_numeric_key_on_map() {
        let tree = json!({"codes": {"1": "x"}});
        let next = with_value_at(&tree, &path("codes[1]"), json!("y"));
        assert_eq!(next, json!({"codes": {"1": "y"}}));
    }

    #[test]
    fn test_with_value_at_keeps_key_order() {
        let tree = json!({"b": 1, "a": 2, "c": 3});
        let next = with_value_at(&tree, &path("a"), json!(9));
        let keys: Vec<_> = next.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_without_value_at() {
        let tree = json!({"a": 1, "b": [1, 2, 3], "c": 3});
        assert_eq!(without_value_at(&tree, &path("a")), json!({"b": [1, 2, 3], "c": 3}));
        assert_eq!(
            without_value_at(&tree, &path("b[0]")),
            json!({"a": 1, "b": [2, 3], "c": 3})
        );
        assert_eq!(without_value_at(&tree, &path("zzz.y")), tree);
    }
}
