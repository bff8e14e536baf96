//! Answer extraction for a single section
//!
//! A section carries an `answers` collection written either as an array of answer objects
//! or as a mapping keyed by answer id. Each entry resolves to a [`FieldSeed`]:
//!
//! - id: first of `label`, `id`, `uniqueId`, then the mapping key
//! - name: first of `name`, `text`, `question`, then the id
//! - type: first of `type`, `questionType`, else `text`
//!
//! Entries without an id or a name, and non-object entries, are skipped.

use super::values::{first_text, Collection};
use crate::form::model::{FieldCatalog, FieldSeed, DEFAULT_FIELD_TYPE};
use serde_json::Value;

pub(crate) const ANSWER_ID_KEYS: &[&str] = &["label", "id", "uniqueId"];
pub(crate) const ANSWER_NAME_KEYS: &[&str] = &["name", "text", "question"];
pub(crate) const ANSWER_TYPE_KEYS: &[&str] = &["type", "questionType"];
const QUESTION_KEYS: &[&str] = &["question", "text"];
const SECTION_NAME_KEYS: &[&str] = &["name", "label"];

/// Scope that extracted answers are filed under.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Placement<'a> {
    Record,
    Row { section: &'a str },
}

/// Display name of a section, if it declares one.
pub(crate) fn section_name(section: &Value) -> Option<String> {
    first_text(section, SECTION_NAME_KEYS)
}

/// Resolve one answer node into a seed. `key` is the mapping key when answers is a mapping.
pub(crate) fn resolve_answer(
    answer: &Value,
    key: Option<&str>,
    page: &str,
    section: &str,
) -> Option<FieldSeed> {
    let raw_id = first_text(answer, ANSWER_ID_KEYS)
        .or_else(|| key.filter(|k| !k.is_empty()).map(str::to_string))?;
    let name = first_text(answer, ANSWER_NAME_KEYS).unwrap_or_else(|| raw_id.clone());
    let field_type =
        first_text(answer, ANSWER_TYPE_KEYS).unwrap_or_else(|| DEFAULT_FIELD_TYPE.to_string());
    let question = first_text(answer, QUESTION_KEYS).unwrap_or_else(|| name.clone());

    Some(FieldSeed {
        raw_id,
        name,
        question,
        field_type,
        page: page.to_string(),
        section: section.to_string(),
    })
}

/// Extract every answer of `section` into the catalog.
pub(crate) fn extract_answers(
    section: &Value,
    page: &str,
    section_label: &str,
    placement: Placement<'_>,
    catalog: &mut FieldCatalog,
) {
    let Some(answers) = Collection::from_value(section.get("answers")) else {
        return;
    };

    for (key, answer) in answers.entries() {
        if !answer.is_object() {
            continue;
        }
        let Some(seed) = resolve_answer(answer, key, page, section_label) else {
            tracing::trace!(page, section = section_label, "skipping answer without id");
            continue;
        };
        match placement {
            Placement::Record => catalog.push_record(seed),
            Placement::Row { section } => catalog.push_row(seed, section),
        }
    }
}
