//! Lookup helpers over loosely typed JSON nodes

use serde_json::{Map, Value};

/// A container that may be written either as an array or as a keyed mapping.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Collection<'a> {
    Array(&'a [Value]),
    Map(&'a Map<String, Value>),
}

impl<'a> Collection<'a> {
    pub(crate) fn from_value(value: Option<&'a Value>) -> Option<Self> {
        match value? {
            Value::Array(items) => Some(Collection::Array(items)),
            Value::Object(map) => Some(Collection::Map(map)),
            _ => None,
        }
    }

    /// Entries in document order, with their key when the container is a mapping.
    pub(crate) fn entries(self) -> Box<dyn Iterator<Item = (Option<&'a str>, &'a Value)> + 'a> {
        match self {
            Collection::Array(items) => Box::new(items.iter().map(|item| (None, item))),
            Collection::Map(map) => Box::new(map.iter().map(|(k, v)| (Some(k.as_str()), v))),
        }
    }
}

/// Render a scalar as identifier text. Empty strings count as absent.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First key of `keys` holding a non-empty text value.
pub(crate) fn first_text(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| node.get(*key).and_then(as_text))
}

/// Whether any of `keys` holds a truthy value.
pub(crate) fn has_any(node: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| node.get(*key).is_some_and(is_truthy))
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
