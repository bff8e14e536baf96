//! Filter expression compiler
//!
//! Turns an ordered list of [`FilterCriterion`] into one boolean expression for an `<#if>`
//! directive. Each criterion renders through a fixed operator table:
//!
//! ```text
//! equals        path == "value"
//! not_equals    path != "value"
//! contains      path CONTAINS("value")
//! not_contains  NOT(path CONTAINS("value"))
//! exists        HAS_CONTENT(path)
//! not_exists    NOT(HAS_CONTENT(path))
//! ```
//!
//! Fragments are joined strictly left to right: every rendered criterion after the first is
//! prefixed with ` AND ` / ` OR ` when it carries a connective. No parentheses are inserted,
//! so a chain mixing AND and OR groups according to the template engine's own precedence.
//!
//! Criteria naming a field that is not in the catalog are skipped.

use crate::session::{FilterCriterion, Operator};
use ftlgen_parser::form::{Field, FieldCatalog, FieldScope};

/// Compiles criteria against one catalog in one scope.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'c> {
    catalog: &'c FieldCatalog,
    scope: FieldScope,
}

impl<'c> FilterCompiler<'c> {
    pub fn new(catalog: &'c FieldCatalog, scope: FieldScope) -> Self {
        FilterCompiler { catalog, scope }
    }

    /// Compile every resolvable criterion.
    pub fn compile(&self, criteria: &[FilterCriterion]) -> String {
        self.compile_matching(criteria, |_| true)
    }

    /// Compile the resolvable criteria whose field satisfies `keep`.
    ///
    /// Split templates use this to send record-level criteria to the main document and each
    /// section's criteria to that section's iteration block.
    pub fn compile_matching<P>(&self, criteria: &[FilterCriterion], keep: P) -> String
    where
        P: Fn(&Field) -> bool,
    {
        let mut expression = String::new();

        for criterion in criteria {
            let Some(field) = self.catalog.find(&criterion.field) else {
                tracing::warn!(field = %criterion.field, "skipping filter on unknown field");
                continue;
            };
            if !keep(field) {
                continue;
            }

            if !expression.is_empty() {
                if let Some(connective) = criterion.connective {
                    expression.push(' ');
                    expression.push_str(connective.keyword());
                    expression.push(' ');
                }
            }
            expression.push_str(&render_condition(&field.path_in(self.scope), criterion));
        }

        expression
    }
}

/// Render one criterion against an already resolved field path.
pub fn render_condition(path: &str, criterion: &FilterCriterion) -> String {
    let value = escape_string(&criterion.value);
    match criterion.operator {
        Operator::Equals => format!("{} == \"{}\"", path, value),
        Operator::NotEquals => format!("{} != \"{}\"", path, value),
        Operator::Contains => format!("{} CONTAINS(\"{}\")", path, value),
        Operator::NotContains => format!("NOT({} CONTAINS(\"{}\"))", path, value),
        Operator::Exists => format!("HAS_CONTENT({})", path),
        Operator::NotExists => format!("NOT(HAS_CONTENT({}))", path),
    }
}

/// Convenience wrapper around [`FilterCompiler::compile`].
pub fn compile_filter(
    criteria: &[FilterCriterion],
    catalog: &FieldCatalog,
    scope: FieldScope,
) -> String {
    FilterCompiler::new(catalog, scope).compile(criteria)
}

/// Escape a value for use inside a double-quoted template string literal.
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
