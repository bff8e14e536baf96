//! Main + repeating template pair
//!
//! The main document has one line per record; the repeating document has one line per row of
//! every repeating section. Both start with the submission id so they can be joined
//! downstream. Both are prefixed with a byte-order marker.
//!
//! ```text
//! SubmissionID,SectionName,RowNumber,"Quantity [Parts]"
//! <#list answers.Parts as row>
//! "${(submission.id)!""}","Parts","${row?counter}","${(row.Qty)!""}"
//! </#list>
//! <#list answers.Tools as row>
//! "${(submission.id)!""}","Tools","${row?counter}"
//! </#list>
//! ```
//!
//! Every registered section gets an iteration block, whether or not any of its fields are
//! selected. A section's line only carries that section's fields.

use crate::filter::FilterCompiler;
use crate::formats::cells::{
    header_cell, if_open, interpolation_cell, list_open, row, value_cell, BYTE_ORDER_MARK,
    IF_CLOSE, LIST_CLOSE,
};
use crate::session::FilterCriterion;
use ftlgen_parser::form::{Field, FieldCatalog, FieldScope};

const MAIN_COLUMNS: [&str; 3] = ["SubmissionID", "FormName", "SubmissionDate"];
const RECORD_EXPRESSIONS: [&str; 3] = ["submission.id", "form.name", "submission.date"];
const REPEATING_COLUMNS: [&str; 3] = ["SubmissionID", "SectionName", "RowNumber"];
const ROW_COUNTER: &str = "row?counter";

/// Record-level document: fixed record columns plus the selected main fields.
///
/// Only criteria on record-scoped fields apply here.
pub fn main_template(
    catalog: &FieldCatalog,
    fields: &[&Field],
    criteria: &[FilterCriterion],
) -> String {
    let main: Vec<&Field> = fields.iter().copied().filter(|f| !f.is_repeating()).collect();
    let filter = FilterCompiler::new(catalog, FieldScope::Record)
        .compile_matching(criteria, |field| !field.is_repeating());

    let mut template = String::from(BYTE_ORDER_MARK);
    template.push_str(&row(MAIN_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(main.iter().map(|field| header_cell(&field.display_name)))));

    if !filter.is_empty() {
        template.push_str(&if_open(&filter));
    }
    template.push_str(&row(RECORD_EXPRESSIONS
        .iter()
        .map(|expr| value_cell(expr))
        .chain(main.iter().map(|field| value_cell(&field.path)))));
    if !filter.is_empty() {
        template.push_str(IF_CLOSE);
    }
    template
}

/// Row-level document: one iteration block per registered repeating section.
///
/// Each block applies only the criteria on its own section's fields, in row scope.
pub fn repeating_template(
    catalog: &FieldCatalog,
    fields: &[&Field],
    criteria: &[FilterCriterion],
) -> String {
    let repeating: Vec<&Field> = fields.iter().copied().filter(|f| f.is_repeating()).collect();

    let mut template = String::from(BYTE_ORDER_MARK);
    template.push_str(&row(REPEATING_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(repeating.iter().map(|field| header_cell(&field.display_name)))));

    let rows = FilterCompiler::new(catalog, FieldScope::Row);
    for section in &catalog.sections {
        let in_section =
            |field: &Field| field.repeating_section.as_deref() == Some(section.name.as_str());
        let filter = rows.compile_matching(criteria, &in_section);

        template.push_str(&list_open(&section.collection_path()));
        if !filter.is_empty() {
            template.push_str(&if_open(&filter));
        }
        template.push_str(&row([
            value_cell("submission.id"),
            header_cell(&section.name),
            interpolation_cell(ROW_COUNTER),
        ]
        .into_iter()
        .chain(
            repeating
                .iter()
                .filter(|field| in_section(*field))
                .map(|field| value_cell(&field.path_in(FieldScope::Row))),
        )));
        if !filter.is_empty() {
            template.push_str(IF_CLOSE);
        }
        template.push_str(LIST_CLOSE);
    }
    template
}
