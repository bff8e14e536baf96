//! JSON-shaped payload templates
//!
//! Each bound sample leaf becomes one member keyed by the leaf's last path segment, with the
//! bound field's path as a null-coalescing expression:
//!
//! ```text
//! {
//!   "sku": "${(answers.PartNo)!""}",
//!   "qty": "${(answers.Qty)!""}"
//! }
//! ```
//!
//! Nesting is flattened: `order.lines[0].sku` and `return.sku` both become `"sku"`, and when two
//! bindings share a key the later one replaces the earlier value in the earlier position.
//! Unbound leaves, structural leaves, and bindings to unknown fields are omitted.

use super::cells::value_cell;
use crate::error::FormatError;
use crate::format::{DocumentRole, Format, TemplateDocument};
use crate::session::{ExportSession, PayloadMapping};
use ftlgen_parser::form::FieldCatalog;

/// Format implementation for payload templates
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadFormat;

impl Format for PayloadFormat {
    fn name(&self) -> &str {
        "payload"
    }

    fn description(&self) -> &str {
        "JSON payload template from a sample document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ftl", "json"]
    }

    fn render(
        &self,
        catalog: &FieldCatalog,
        session: &ExportSession,
    ) -> Result<Vec<TemplateDocument>, FormatError> {
        let mapping = session
            .payload
            .as_ref()
            .ok_or(FormatError::MissingPayload)?;
        Ok(vec![TemplateDocument::new(
            DocumentRole::Payload,
            compile_payload(mapping, catalog),
        )])
    }
}

/// Compile the mapping's bindings, in binding order.
pub fn compile_payload(mapping: &PayloadMapping, catalog: &FieldCatalog) -> String {
    let mut members: Vec<(&str, String)> = Vec::new();

    for binding in &mapping.bindings {
        let Some(leaf) = mapping.leaf(&binding.path).filter(|leaf| leaf.mappable) else {
            tracing::warn!(path = %binding.path, "skipping binding to unknown or structural leaf");
            continue;
        };
        let Some(field) = catalog.find(&binding.field) else {
            tracing::warn!(field = %binding.field, "skipping binding to unknown field");
            continue;
        };

        let expression = value_cell(&field.path);
        match members.iter_mut().find(|(key, _)| *key == leaf.key()) {
            Some(member) => member.1 = expression,
            None => members.push((leaf.key(), expression)),
        }
    }

    if members.is_empty() {
        return "{}\n".to_string();
    }

    let body: Vec<String> = members
        .iter()
        .map(|(key, expression)| format!("  {}: {}", quote_key(key), expression))
        .collect();
    format!("{{\n{}\n}}\n", body.join(",\n"))
}

fn quote_key(key: &str) -> String {
    serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
}
