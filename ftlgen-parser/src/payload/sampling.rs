//! Recursive flattening of a sample document into leaf paths
//!
//! Objects and arrays are recorded as structural markers (not mappable) and descended into;
//! arrays contribute only their first element. Scalars are recorded as mappable leaves typed
//! `string`, `number`, or `boolean` (`null` counts as `string`).
//!
//! Paths use dots for object keys and `[0]` for the sampled array element:
//!
//! ```text
//! {"order": {"lines": [{"sku": "A1"}]}}
//!
//! order            object
//! order.lines      array
//! order.lines[0]   object
//! order.lines[0].sku   string  (mappable)
//! ```

use crate::form::extraction::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default cap on the length of rendered examples.
pub const DEFAULT_EXAMPLE_MAX_CHARS: usize = 50;

/// Error raised when a sample document cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("sample payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Object => "object",
            PayloadKind::Array => "array",
            PayloadKind::String => "string",
            PayloadKind::Number => "number",
            PayloadKind::Boolean => "boolean",
        }
    }
}

/// One node of the flattened sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadLeaf {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    pub example: String,
    pub mappable: bool,
}

impl PayloadLeaf {
    /// Last segment of the path with any array index removed (`lines[0].sku` → `sku`).
    pub fn key(&self) -> &str {
        let last = self.path.rsplit('.').next().unwrap_or_default();
        match last.find('[') {
            Some(index) => &last[..index],
            None => last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub max_depth: usize,
    pub example_max_chars: usize,
}

impl Default for SampleOptions {
    fn default() -> Self {
        SampleOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            example_max_chars: DEFAULT_EXAMPLE_MAX_CHARS,
        }
    }
}

/// Decode `text` and flatten it. Undecodable input yields an error and no leaves.
pub fn parse_payload(text: &str, options: &SampleOptions) -> Result<Vec<PayloadLeaf>, PayloadError> {
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    Ok(sample_payload(&value, options))
}

/// Flatten an already decoded sample.
pub fn sample_payload(value: &Value, options: &SampleOptions) -> Vec<PayloadLeaf> {
    let mut leaves = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(child, key.clone(), 1, options, &mut leaves);
            }
        }
        Value::Array(items) => {
            if let Some(first) = items.first() {
                visit(first, "[0]".to_string(), 1, options, &mut leaves);
            }
        }
        scalar => visit(scalar, String::new(), 1, options, &mut leaves),
    }
    leaves
}

fn visit(
    value: &Value,
    path: String,
    depth: usize,
    options: &SampleOptions,
    leaves: &mut Vec<PayloadLeaf>,
) {
    if depth > options.max_depth {
        tracing::warn!(%path, "payload sampling stopped at depth limit");
        return;
    }

    let example = truncate(&render(value), options.example_max_chars);
    match value {
        Value::Object(map) => {
            leaves.push(PayloadLeaf {
                path: path.clone(),
                kind: PayloadKind::Object,
                example,
                mappable: false,
            });
            for (key, child) in map {
                visit(child, format!("{}.{}", path, key), depth + 1, options, leaves);
            }
        }
        Value::Array(items) => {
            leaves.push(PayloadLeaf {
                path: path.clone(),
                kind: PayloadKind::Array,
                example,
                mappable: false,
            });
            if let Some(first) = items.first() {
                visit(first, format!("{}[0]", path), depth + 1, options, leaves);
            }
        }
        scalar => leaves.push(PayloadLeaf {
            path,
            kind: match scalar {
                Value::Number(_) => PayloadKind::Number,
                Value::Bool(_) => PayloadKind::Boolean,
                _ => PayloadKind::String,
            },
            example,
            mappable: true,
        }),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(leaves: &[PayloadLeaf]) -> Vec<(&str, PayloadKind, bool)> {
        leaves
            .iter()
            .map(|l| (l.path.as_str(), l.kind, l.mappable))
            .collect()
    }

    #[test]
    fn test_flattens_nested_objects_and_first_array_element() {
        let leaves = sample_payload(
            &json!({
                "id": 7,
                "customer": {"name": "Ada", "vip": true},
                "lines": [{"sku": "A1"}, {"sku": "B2"}]
            }),
            &SampleOptions::default(),
        );

        assert_eq!(
            paths(&leaves),
            vec![
                ("id", PayloadKind::Number, true),
                ("customer", PayloadKind::Object, false),
                ("customer.name", PayloadKind::String, true),
                ("customer.vip", PayloadKind::Boolean, true),
                ("lines", PayloadKind::Array, false),
                ("lines[0]", PayloadKind::Object, false),
                ("lines[0].sku", PayloadKind::String, true),
            ]
        );
    }

    #[test]
    fn test_null_defaults_to_string() {
        let leaves = sample_payload(&json!({"note": null}), &SampleOptions::default());
        assert_eq!(leaves[0].kind, PayloadKind::String);
        assert_eq!(leaves[0].example, "null");
    }

    #[test]
    fn test_examples_are_truncated() {
        let options = SampleOptions {
            example_max_chars: 5,
            ..SampleOptions::default()
        };
        let leaves = sample_payload(&json!({"text": "abcdefghij"}), &options);
        assert_eq!(leaves[0].example, "abcde...");
    }

    #[test]
    fn test_root_array_samples_first_element() {
        let leaves = sample_payload(&json!([{"a": 1}, {"b": 2}]), &SampleOptions::default());
        assert_eq!(
            paths(&leaves),
            vec![
                ("[0]", PayloadKind::Object, false),
                ("[0].a", PayloadKind::Number, true),
            ]
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = parse_payload("{\"a\": ", &SampleOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_key_is_last_segment_without_index() {
        let leaf = |path: &str| PayloadLeaf {
            path: path.to_string(),
            kind: PayloadKind::String,
            example: String::new(),
            mappable: true,
        };
        assert_eq!(leaf("lines[0].sku").key(), "sku");
        assert_eq!(leaf("tags[0]").key(), "tags");
        assert_eq!(leaf("id").key(), "id");
    }

    #[test]
    fn test_depth_limit() {
        let options = SampleOptions {
            max_depth: 2,
            ..SampleOptions::default()
        };
        let leaves = sample_payload(&json!({"a": {"b": {"c": 1}}}), &options);
        assert_eq!(
            paths(&leaves),
            vec![
                ("a", PayloadKind::Object, false),
                ("a.b", PayloadKind::Object, false),
            ]
        );
    }
}
