//! Field identity resolution
//!
//! Raw identifiers are not unique across a form: the same question id can appear on several
//! pages, or once in the main form and again inside a repeating section. Selection needs a
//! handle per field, so every field gets a `unique_id`:
//!
//! - the first occurrence of a raw id keeps it verbatim
//! - every later occurrence gets `<raw_id>_<n>`, `n` counting from 1 in encounter order
//!
//! The pass is order dependent but deterministic: the same ordered input always produces the
//! same ids. Paths are never touched.

use super::model::Field;
use std::collections::HashMap;

/// Assign `unique_id` to every field, in iteration order.
pub fn resolve_identities<'a, I>(fields: I)
where
    I: IntoIterator<Item = &'a mut Field>,
{
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    for field in fields {
        let count = occurrences.entry(field.raw_id.clone()).or_insert(0);
        field.unique_id = Some(if *count == 0 {
            field.raw_id.clone()
        } else {
            format!("{}_{}", field.raw_id, count)
        });
        *count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::model::{FieldCatalog, FieldSeed};

    fn field(id: &str) -> Field {
        Field::record(FieldSeed {
            raw_id: id.to_string(),
            name: id.to_string(),
            question: id.to_string(),
            field_type: "text".to_string(),
            page: String::new(),
            section: String::new(),
        })
    }

    fn unique_ids(fields: &[Field]) -> Vec<&str> {
        fields
            .iter()
            .map(|f| f.unique_id.as_deref().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_first_occurrence_keeps_raw_id() {
        let mut fields = vec![field("Q1"), field("Q2")];
        resolve_identities(fields.iter_mut());
        assert_eq!(unique_ids(&fields), vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_duplicates_get_positional_suffix() {
        let mut fields = vec![field("Q1"), field("Q2"), field("Q1"), field("Q1")];
        resolve_identities(fields.iter_mut());
        assert_eq!(unique_ids(&fields), vec!["Q1", "Q2", "Q1_1", "Q1_2"]);
    }

    #[test]
    fn test_paths_are_untouched() {
        let mut fields = vec![field("Q1"), field("Q1")];
        resolve_identities(fields.iter_mut());
        assert_eq!(fields[1].path, "answers.Q1");
        assert_eq!(fields[1].clean_id, "Q1");
    }

    #[test]
    fn test_rerun_is_stable() {
        let mut fields = vec![field("A"), field("A"), field("B")];
        resolve_identities(fields.iter_mut());
        let first = fields.clone();
        resolve_identities(fields.iter_mut());
        assert_eq!(first, fields);
    }

    #[test]
    fn test_catalog_resolves_main_before_repeating() {
        let mut catalog = FieldCatalog::new();
        let seed = |id: &str| FieldSeed {
            raw_id: id.to_string(),
            name: id.to_string(),
            question: id.to_string(),
            field_type: "text".to_string(),
            page: "P".to_string(),
            section: "S".to_string(),
        };
        catalog.push_row(seed("Q1"), "Items");
        catalog.push_record(seed("Q1"));
        catalog.resolve_identities();

        assert_eq!(catalog.main[0].unique_id.as_deref(), Some("Q1"));
        assert_eq!(catalog.repeating[0].unique_id.as_deref(), Some("Q1_1"));
    }
}
