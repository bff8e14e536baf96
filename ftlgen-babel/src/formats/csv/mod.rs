//! CSV export templates
//!
//! Compiles the session's selection and filters into FreeMarker-style templates that render one
//! CSV line per submitted record.
//!
//! ## Single mode
//!
//! ```text
//! "Name","Hours"
//! <#if answers.Hours != "0">
//! "${(answers.Q1)!""}","${(answers.Hours)!""}"
//! </#if>
//! ```
//!
//! The `<#if>` wrapper only appears when at least one criterion resolves. Columns follow
//! selection order.
//!
//! ## Split mode
//!
//! Two documents joined on the submission id, see [split]. Used when a row-scoped field is
//! selected (or the session forces it).

mod split;

pub use split::{main_template, repeating_template};

use super::cells::{header_cell, if_open, row, value_cell, IF_CLOSE};
use crate::error::FormatError;
use crate::filter::FilterCompiler;
use crate::format::{DocumentRole, Format, TemplateDocument};
use crate::session::{ExportSession, TemplateMode};
use ftlgen_parser::form::{Field, FieldCatalog, FieldScope};

/// Format implementation for CSV export templates
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvFormat;

impl CsvFormat {
    /// Whether the session renders as a main/repeating pair.
    pub fn is_split(catalog: &FieldCatalog, session: &ExportSession) -> bool {
        match session.mode {
            TemplateMode::Single => false,
            TemplateMode::Split => true,
            TemplateMode::Auto => session
                .selected_fields(catalog)
                .iter()
                .any(|field| field.is_repeating()),
        }
    }
}

impl Format for CsvFormat {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "CSV export template (single, or main + repeating)"
    }

    fn render(
        &self,
        catalog: &FieldCatalog,
        session: &ExportSession,
    ) -> Result<Vec<TemplateDocument>, FormatError> {
        let fields = session.selected_fields(catalog);

        if Self::is_split(catalog, session) {
            tracing::debug!(selected = fields.len(), "rendering split csv templates");
            return Ok(vec![
                TemplateDocument::new(
                    DocumentRole::Main,
                    main_template(catalog, &fields, &session.filters),
                ),
                TemplateDocument::new(
                    DocumentRole::Repeating,
                    repeating_template(catalog, &fields, &session.filters),
                ),
            ]);
        }

        let filter = FilterCompiler::new(catalog, FieldScope::Record).compile(&session.filters);
        tracing::debug!(selected = fields.len(), filtered = !filter.is_empty(), "rendering csv template");
        Ok(vec![TemplateDocument::new(
            DocumentRole::Single,
            single_template(&fields, &filter),
        )])
    }
}

/// One-document template. An empty selection renders as the empty string.
pub fn single_template(fields: &[&Field], filter: &str) -> String {
    if fields.is_empty() {
        return String::new();
    }

    let mut template = row(fields.iter().map(|field| header_cell(&field.display_name)));
    if !filter.is_empty() {
        template.push_str(&if_open(filter));
    }
    template.push_str(&row(fields.iter().map(|field| value_cell(&field.path))));
    if !filter.is_empty() {
        template.push_str(IF_CLOSE);
    }
    template
}
