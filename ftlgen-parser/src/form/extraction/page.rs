//! Page and section classification
//!
//! A page holds a `sections` collection (array or mapping). Each section is either:
//!
//! - a repeating section (`"type": "Repeat"`): its structure is sampled from the first entry
//!   of `rows` only, since all rows share one layout. The row's sub-pages (or, for flattened
//!   exports, the row's own `sections`) yield row-scoped fields tagged with the section name.
//! - anything else: a record-scoped section.

use super::section::{extract_answers, section_name, Placement};
use super::values::{first_text, Collection};
use crate::form::model::{FieldCatalog, REPEAT_MARKER};
use serde_json::Value;

/// Provenance labels of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageInfo {
    name: Option<String>,
    label: Option<String>,
}

impl PageInfo {
    pub(crate) fn from_node(page: &Value) -> Self {
        PageInfo {
            name: first_text(page, &["name", "label", "title"]),
            label: first_text(page, &["label", "name"]),
        }
    }

    /// The synthetic page used when sections sit at the document root.
    pub(crate) fn main() -> Self {
        PageInfo {
            name: Some("Main Page".to_string()),
            label: Some("main".to_string()),
        }
    }

    pub(crate) fn provenance(&self) -> &str {
        self.name
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or_default()
    }
}

pub(crate) fn extract_pages(pages: Collection<'_>, catalog: &mut FieldCatalog) {
    for (_, page) in pages.entries() {
        extract_page(page, catalog);
    }
}

pub(crate) fn extract_page(page: &Value, catalog: &mut FieldCatalog) {
    let info = PageInfo::from_node(page);
    if let Some(sections) = Collection::from_value(page.get("sections")) {
        extract_sections(sections, &info, catalog);
    }
}

pub(crate) fn extract_sections(
    sections: Collection<'_>,
    page: &PageInfo,
    catalog: &mut FieldCatalog,
) {
    for (index, (_, section)) in sections.entries().enumerate() {
        if is_repeating(section) {
            extract_repeating(section, index, page, catalog);
        } else {
            let label = section_name(section).unwrap_or_default();
            extract_answers(
                section,
                page.provenance(),
                &label,
                Placement::Record,
                catalog,
            );
        }
    }
}

fn is_repeating(section: &Value) -> bool {
    section.get("type").and_then(Value::as_str) == Some(REPEAT_MARKER)
}

fn extract_repeating(section: &Value, index: usize, page: &PageInfo, catalog: &mut FieldCatalog) {
    let name = first_text(section, &["name", "label", "id"])
        .unwrap_or_else(|| format!("{} {}", REPEAT_MARKER, index + 1));

    let Some(first_row) = section
        .get("rows")
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
    else {
        tracing::debug!(section = %name, "repeating section has no rows to sample");
        return;
    };

    let placement = Placement::Row { section: &name };
    let mut extract_row_sections = |sections: Collection<'_>| {
        for (_, sub_section) in sections.entries() {
            let label = section_name(sub_section).unwrap_or_else(|| name.clone());
            extract_answers(sub_section, page.provenance(), &label, placement, catalog);
        }
    };

    if let Some(sub_pages) = Collection::from_value(first_row.get("pages")) {
        for (_, sub_page) in sub_pages.entries() {
            if let Some(sections) = Collection::from_value(sub_page.get("sections")) {
                extract_row_sections(sections);
            }
        }
    } else if let Some(sections) = Collection::from_value(first_row.get("sections")) {
        extract_row_sections(sections);
    }
}
