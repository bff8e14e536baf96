//! Export session state
//!
//! Everything a front end collects from the user between uploading a form and downloading
//! templates: the ordered field selection, the filter criteria, the template mode, and an
//! optional payload mapping. The session is a plain value passed into every render call, so
//! formats stay pure functions of `(catalog, session)`.

use ftlgen_parser::form::{Field, FieldCatalog};
use ftlgen_parser::payload::PayloadLeaf;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied by a filter criterion.
///
/// Unrecognised operator names parse as [`Operator::Equals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Exists,
    NotExists,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::Exists,
        Operator::NotExists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Exists => "exists",
            Operator::NotExists => "not_exists",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "Not Equals",
            Operator::Contains => "Contains",
            Operator::NotContains => "Does Not Contain",
            Operator::Exists => "Has Value",
            Operator::NotExists => "Is Empty",
        }
    }

    /// Whether the criterion's value takes part in the rendered expression.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Operator::Exists | Operator::NotExists)
    }

    /// Lenient parse: unknown names fall back to `Equals`.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Operator::Equals)
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::parse(&name)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical connective joining a criterion to everything before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Keyword emitted into the filter expression.
    pub fn keyword(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// `or` / `||` in any case parse as [`Connective::Or`]; anything else is `And`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("or") || text == "||" {
            Connective::Or
        } else {
            Connective::And
        }
    }
}

impl From<String> for Connective {
    fn from(text: String) -> Self {
        Connective::parse(&text)
    }
}

impl From<Connective> for String {
    fn from(connective: Connective) -> Self {
        connective.keyword().to_lowercase()
    }
}

fn default_connective() -> Option<Connective> {
    Some(Connective::And)
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// Field identifier, resolved with [`FieldCatalog::find`].
    #[serde(alias = "fieldRef")]
    pub field: String,
    #[serde(default = "default_operator")]
    pub operator: Operator,
    /// Ignored by operators that don't take a value.
    #[serde(default)]
    pub value: String,
    /// Ignored on the first rendered criterion.
    #[serde(default = "default_connective", alias = "logic")]
    pub connective: Option<Connective>,
}

fn default_operator() -> Operator {
    Operator::Equals
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        FilterCriterion {
            field: field.into(),
            operator,
            value: value.into(),
            connective: Some(Connective::And),
        }
    }

    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = Some(connective);
        self
    }
}

/// How CSV templates are split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    /// Split only when a row-scoped field is selected.
    #[default]
    Auto,
    /// Always one document.
    Single,
    /// Always a main and a repeating document.
    Split,
}

/// A sample leaf path bound to a field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadBinding {
    pub path: String,
    pub field: String,
}

/// Sample payload leaves plus the user's leaf → field bindings, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMapping {
    pub leaves: Vec<PayloadLeaf>,
    #[serde(default)]
    pub bindings: Vec<PayloadBinding>,
}

impl PayloadMapping {
    pub fn new(leaves: Vec<PayloadLeaf>) -> Self {
        PayloadMapping {
            leaves,
            bindings: Vec::new(),
        }
    }

    /// Bind a leaf path to a field. Rebinding a path keeps its original position.
    pub fn bind(&mut self, path: impl Into<String>, field: impl Into<String>) {
        let path = path.into();
        let field = field.into();
        match self.bindings.iter_mut().find(|b| b.path == path) {
            Some(existing) => existing.field = field,
            None => self.bindings.push(PayloadBinding { path, field }),
        }
    }

    pub fn unbind(&mut self, path: &str) {
        self.bindings.retain(|b| b.path != path);
    }

    pub fn leaf(&self, path: &str) -> Option<&PayloadLeaf> {
        self.leaves.iter().find(|leaf| leaf.path == path)
    }
}

/// User choices for one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSession {
    pub selected: Vec<String>,
    pub filters: Vec<FilterCriterion>,
    pub mode: TemplateMode,
    pub payload: Option<PayloadMapping>,
}

impl ExportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the selection. Already selected ids keep their position.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.retain(|selected| selected != id);
    }

    /// Flip the selection state of a field.
    pub fn toggle(&mut self, id: &str) {
        if self.selected.iter().any(|selected| selected == id) {
            self.deselect(id);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Select every field of the catalog, in catalog order.
    pub fn select_all(&mut self, catalog: &FieldCatalog) {
        self.selected = catalog
            .fields()
            .map(|field| field.identifier().to_string())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn add_filter(&mut self, criterion: FilterCriterion) {
        self.filters.push(criterion);
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterCriterion> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    /// Selected fields in selection order. Unknown and repeated ids are skipped.
    pub fn selected_fields<'c>(&self, catalog: &'c FieldCatalog) -> Vec<&'c Field> {
        let mut fields: Vec<&Field> = Vec::with_capacity(self.selected.len());
        for id in &self.selected {
            match catalog.find(id) {
                Some(field) if !fields.iter().any(|f| std::ptr::eq(*f, field)) => {
                    fields.push(field)
                }
                Some(_) => {}
                None => tracing::warn!(field = %id, "selected field not found in catalog"),
            }
        }
        fields
    }

    /// Number of filter criteria that resolve to a field.
    pub fn applied_filters(&self, catalog: &FieldCatalog) -> usize {
        self.filters
            .iter()
            .filter(|criterion| catalog.find(&criterion.field).is_some())
            .count()
    }
}
