//! Unconstrained recursive search
//!
//! Used when a document matches none of the known root shapes. Only a mapping root is searched;
//! any other root yields no fields. Below the root, any non-empty mapping that
//! carries a `label`, `name`, or `question` is taken as a field; other non-empty mappings and
//! arrays are descended into with the path extended by their key (array elements use their
//! index). Every field found this way is record-scoped, and `section` is always `Unknown`.

use super::section::{ANSWER_ID_KEYS, ANSWER_NAME_KEYS, ANSWER_TYPE_KEYS};
use super::values::{first_text, has_any};
use crate::form::model::{FieldCatalog, FieldSeed, DEFAULT_FIELD_TYPE};
use serde_json::Value;

const FIELD_MARKER_KEYS: &[&str] = &["label", "name", "question"];
const UNKNOWN: &str = "Unknown";

struct FallbackWalker<'c> {
    catalog: &'c mut FieldCatalog,
    max_depth: usize,
    truncated: bool,
}

pub(crate) fn walk(doc: &Value, max_depth: usize, catalog: &mut FieldCatalog) {
    if !doc.is_object() {
        tracing::debug!("fallback search skipped: document root is not a mapping");
        return;
    }

    let mut walker = FallbackWalker {
        catalog,
        max_depth,
        truncated: false,
    };
    walker.visit(doc, "", 0);
    if walker.truncated {
        tracing::warn!(max_depth, "fallback search stopped at depth limit");
    }
}

impl FallbackWalker<'_> {
    fn visit(&mut self, node: &Value, path: &str, depth: usize) {
        if depth > self.max_depth {
            self.truncated = true;
            return;
        }
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    self.visit_entry(key, value, path, depth);
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    self.visit_entry(&index.to_string(), value, path, depth);
                }
            }
            _ => {}
        }
    }

    fn visit_entry(&mut self, key: &str, value: &Value, path: &str, depth: usize) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                if has_any(value, FIELD_MARKER_KEYS) {
                    self.record(key, value, path);
                } else {
                    self.visit(value, &join(path, key), depth + 1);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                self.visit(value, &join(path, key), depth + 1);
            }
            _ => {}
        }
    }

    fn record(&mut self, key: &str, node: &Value, path: &str) {
        let fallback_key = Some(key.to_string()).filter(|k| !k.is_empty());
        let Some(raw_id) = first_text(node, ANSWER_ID_KEYS).or_else(|| fallback_key.clone()) else {
            return;
        };
        let Some(name) = first_text(node, ANSWER_NAME_KEYS).or(fallback_key) else {
            return;
        };
        let field_type =
            first_text(node, ANSWER_TYPE_KEYS).unwrap_or_else(|| DEFAULT_FIELD_TYPE.to_string());

        self.catalog.push_record(FieldSeed {
            raw_id,
            question: name.clone(),
            name,
            field_type,
            page: if path.is_empty() {
                UNKNOWN.to_string()
            } else {
                path.to_string()
            },
            section: UNKNOWN.to_string(),
        });
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn walk_default(doc: &Value) -> FieldCatalog {
        let mut catalog = FieldCatalog::new();
        walk(doc, 64, &mut catalog);
        catalog
    }

    #[test]
    fn test_finds_nested_fields_with_dotted_page() {
        let catalog = walk_default(&json!({
            "form": {
                "questions": {
                    "q1": {"label": "Q1", "name": "First"},
                    "q2": {"question": "Second?"}
                }
            },
            "top": {"name": "Top"}
        }));

        assert_eq!(catalog.main.len(), 3);
        assert_eq!(catalog.main[0].raw_id, "Q1");
        assert_eq!(catalog.main[0].page, "form.questions");
        assert_eq!(catalog.main[0].section, "Unknown");
        assert_eq!(catalog.main[1].raw_id, "q2");
        assert_eq!(catalog.main[1].name, "Second?");
        assert_eq!(catalog.main[2].page, "Unknown");
    }

    #[test]
    fn test_descends_into_arrays() {
        let catalog = walk_default(&json!({"items": [{"label": "A", "name": "Ay"}, {"id": "B", "name": "Bee"}]}));

        assert_eq!(catalog.main.len(), 2);
        assert_eq!(catalog.main[0].raw_id, "A");
        assert_eq!(catalog.main[1].raw_id, "B");
        assert_eq!(catalog.main[1].page, "items");

        // Unlabelled array elements fall back to their index
        let catalog = walk_default(&json!({"items": [{"name": "Only"}]}));
        assert_eq!(catalog.main[0].raw_id, "0");
    }

    #[test]
    fn test_never_produces_repeating_fields() {
        let catalog = walk_default(&json!({"x": {"type": "Repeat", "rows": [{"q": {"name": "Q"}}]}}));
        assert!(catalog.repeating.is_empty());
        assert!(catalog.sections.is_empty());
        assert_eq!(catalog.main.len(), 1);
    }

    #[test]
    fn test_depth_limit_stops_descent() {
        let doc = json!({"a": {"b": {"c": {"d": {"name": "Deep"}}}}});
        let mut catalog = FieldCatalog::new();
        walk(&doc, 2, &mut catalog);
        assert!(catalog.is_empty());

        walk(&doc, 3, &mut catalog);
        assert_eq!(catalog.main.len(), 1);
    }

    #[test]
    fn test_non_mapping_root_yields_nothing() {
        assert!(walk_default(&json!([{"name": "A"}])).is_empty());
        assert!(walk_default(&json!([[{"label": "B"}]])).is_empty());
        assert!(walk_default(&json!("text")).is_empty());
    }

    #[test]
    fn test_scalars_and_empty_containers_ignored() {
        let catalog = walk_default(&json!({"a": 1, "b": "x", "c": {}, "d": []}));
        assert!(catalog.is_empty());
    }
}
