//! Catalog queries used by front ends: search, summary counts, and a structural description
//! of documents that produced no fields.

use super::model::{Field, FieldCatalog};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Headline counts for a loaded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub fields: usize,
    pub pages: usize,
    pub sections: usize,
    pub repeating_sections: usize,
}

impl FieldCatalog {
    /// Fields whose name, page, or section contains `term`, ignoring case.
    ///
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Field> {
        let needle = term.to_lowercase();
        self.fields()
            .filter(|field| {
                needle.is_empty()
                    || field.name.to_lowercase().contains(&needle)
                    || field.page.to_lowercase().contains(&needle)
                    || field.section.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn summary(&self) -> FormSummary {
        let pages: BTreeSet<&str> = self
            .fields()
            .map(|f| f.page.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        let sections: BTreeSet<&str> = self
            .fields()
            .map(|f| f.section.as_str())
            .filter(|s| !s.is_empty())
            .collect();

        FormSummary {
            fields: self.len(),
            pages: pages.len(),
            sections: sections.len(),
            repeating_sections: self.sections.len(),
        }
    }
}

/// JSON type name of every top-level key, in document order.
///
/// Meant for explaining why a document yielded no fields.
pub fn describe_structure(doc: &Value) -> Vec<(String, &'static str)> {
    match doc {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), type_name(value)))
            .collect(),
        other => vec![(String::new(), type_name(other))],
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::extraction::{build_catalog, ExtractOptions};
    use serde_json::json;

    fn catalog() -> FieldCatalog {
        build_catalog(
            &json!({"pages": [
                {"name": "Site", "sections": [{"name": "Address", "answers": [
                    {"id": "Q1", "name": "Street"},
                    {"id": "Q2", "name": "City"}
                ]}]},
                {"name": "Work", "sections": [
                    {"name": "Labour", "answers": [{"id": "Q3", "name": "Hours"}]},
                    {"name": "Parts", "type": "Repeat", "rows": [
                        {"pages": [{"sections": [{"answers": [{"id": "R1", "name": "Part"}]}]}]}
                    ]}
                ]}
            ]}),
            &ExtractOptions::default(),
        )
    }

    #[test]
    fn test_search_matches_name_page_and_section() {
        let catalog = catalog();
        let ids = |term: &str| -> Vec<String> {
            catalog
                .search(term)
                .iter()
                .map(|f| f.raw_id.clone())
                .collect()
        };

        assert_eq!(ids("city"), vec!["Q2"]);
        assert_eq!(ids("SITE"), vec!["Q1", "Q2"]);
        assert_eq!(ids("labour"), vec!["Q3"]);
        assert_eq!(ids("").len(), 4);
        assert!(ids("nothing").is_empty());
    }

    #[test]
    fn test_summary_counts_distinct_values() {
        let summary = catalog().summary();
        assert_eq!(
            summary,
            FormSummary {
                fields: 4,
                pages: 2,
                sections: 3,
                repeating_sections: 1,
            }
        );
    }

    #[test]
    fn test_describe_structure() {
        let described = describe_structure(&json!({"title": "x", "items": [], "meta": {}}));
        assert_eq!(
            described,
            vec![
                ("title".to_string(), "string"),
                ("items".to_string(), "array"),
                ("meta".to_string(), "object"),
            ]
        );
    }
}
