//! Field catalog data model
//!
//!     A [`Field`] is one exportable data point found in a form definition. Fields are either
//!     record-scoped (they occur once per submitted record) or row-scoped (they occur once per
//!     row of a repeating section). Row-scoped fields always name their [`RepeatingSection`],
//!     and the catalog keeps exactly one registry entry per section name.
//!
//!     Identifiers come in three flavours:
//!
//!     - `raw_id`: as found in the document, spaces and all.
//!     - `clean_id`: the identifier the export engine indexes by (spaces removed, at most
//!       [`CLEAN_ID_MAX_CHARS`] characters). Derived once, used to build `path`.
//!     - `unique_id`: presentation-level disambiguator assigned by
//!       [`resolve_identities`](super::identity::resolve_identities). Never used for paths.

use serde::{Deserialize, Serialize};

/// Value of a section's `type` key that marks it as a repeating section.
pub const REPEAT_MARKER: &str = "Repeat";

/// Maximum length, in characters, of a cleaned identifier.
pub const CLEAN_ID_MAX_CHARS: usize = 19;

/// Type tag used when an answer does not declare one.
pub const DEFAULT_FIELD_TYPE: &str = "text";

/// Strip spaces from an identifier and truncate it to [`CLEAN_ID_MAX_CHARS`] characters.
pub fn clean_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ' ')
        .take(CLEAN_ID_MAX_CHARS)
        .collect()
}

/// Where a field's value lives relative to a submitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldScope {
    /// Once per record (main form).
    Record,
    /// Once per row of a repeating section.
    Row,
}

/// Values resolved from one answer entry, before scoping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSeed {
    pub raw_id: String,
    pub name: String,
    pub question: String,
    pub field_type: String,
    pub page: String,
    pub section: String,
}

/// One exportable data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub raw_id: String,
    pub clean_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    pub name: String,
    pub question: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub page: String,
    pub section: String,
    pub path: String,
    #[serde(default)]
    pub repeating_section: Option<String>,
    pub display_name: String,
}

impl Field {
    /// Build a record-scoped field addressed as `answers.<clean_id>`.
    pub fn record(seed: FieldSeed) -> Self {
        let clean_id = clean_identifier(&seed.raw_id);
        Field {
            path: format!("answers.{}", clean_id),
            display_name: seed.name.clone(),
            clean_id,
            unique_id: None,
            raw_id: seed.raw_id,
            name: seed.name,
            question: seed.question,
            field_type: seed.field_type,
            page: seed.page,
            section: seed.section,
            repeating_section: None,
        }
    }

    /// Build a row-scoped field addressed as `row.<clean_id>` inside an iteration block.
    pub fn row(seed: FieldSeed, repeating_section: &str) -> Self {
        let clean_id = clean_identifier(&seed.raw_id);
        Field {
            path: format!("row.{}", clean_id),
            display_name: format!("{} [{}]", seed.name, repeating_section),
            clean_id,
            unique_id: None,
            raw_id: seed.raw_id,
            name: seed.name,
            question: seed.question,
            field_type: seed.field_type,
            page: seed.page,
            section: seed.section,
            repeating_section: Some(repeating_section.to_string()),
        }
    }

    /// Identifier used for selection and filter lookup: the unique id when one has been
    /// assigned, otherwise the raw id.
    pub fn identifier(&self) -> &str {
        self.unique_id.as_deref().unwrap_or(&self.raw_id)
    }

    pub fn scope(&self) -> FieldScope {
        if self.repeating_section.is_some() {
            FieldScope::Row
        } else {
            FieldScope::Record
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating_section.is_some()
    }

    /// Expression that dereferences this field when rendered in the given scope.
    ///
    /// Inside an iteration block every field is addressed relative to the loop variable;
    /// everywhere else the stored `path` is used as-is.
    pub fn path_in(&self, scope: FieldScope) -> String {
        match scope {
            FieldScope::Row => format!("row.{}", self.clean_id),
            FieldScope::Record => self.path.clone(),
        }
    }
}

/// A named group of row-scoped fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingSection {
    pub name: String,
    pub page: String,
}

impl RepeatingSection {
    /// Expression naming the row collection this section iterates over.
    pub fn collection_path(&self) -> String {
        format!("answers.{}", clean_identifier(&self.name))
    }
}

/// Fields extracted from one form definition, partitioned by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub main: Vec<Field>,
    pub repeating: Vec<Field>,
    pub sections: Vec<RepeatingSection>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record-scoped field.
    pub fn push_record(&mut self, seed: FieldSeed) {
        self.main.push(Field::record(seed));
    }

    /// Append a row-scoped field, registering its section on first sight.
    pub fn push_row(&mut self, seed: FieldSeed, section: &str) {
        if !self.sections.iter().any(|s| s.name == section) {
            self.sections.push(RepeatingSection {
                name: section.to_string(),
                page: seed.page.clone(),
            });
        }
        self.repeating.push(Field::row(seed, section));
    }

    /// All fields, main first then repeating, in extraction order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.main.iter().chain(self.repeating.iter())
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.repeating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.repeating.is_empty()
    }

    /// Look a field up by its [`Field::identifier`].
    pub fn find(&self, id: &str) -> Option<&Field> {
        self.fields().find(|field| field.identifier() == id)
    }

    /// Assign unique ids across main then repeating fields.
    pub fn resolve_identities(&mut self) {
        super::identity::resolve_identities(self.main.iter_mut().chain(self.repeating.iter_mut()));
    }
}
