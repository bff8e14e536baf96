//! End-to-end template rendering from fixture forms

use ftlgen_babel::formats::csv::single_template;
use ftlgen_babel::{
    compile_filter, Connective, DocumentRole, ExportSession, FilterCriterion, FormatRegistry,
    Operator, TemplateDocument, TemplateMode,
};
use ftlgen_parser::form::{build_catalog, ExtractOptions, FieldCatalog, FieldScope};
use ftlgen_parser::testing::FormFixtures;
use proptest::prelude::*;
use serde_json::json;

fn render(catalog: &FieldCatalog, session: &ExportSession) -> Vec<TemplateDocument> {
    FormatRegistry::with_defaults()
        .render(catalog, session, "csv")
        .unwrap()
}

fn without_bom(document: &TemplateDocument) -> &str {
    document
        .contents
        .strip_prefix('\u{feff}')
        .expect("split documents start with a byte-order marker")
}

fn selecting(ids: &[&str]) -> ExportSession {
    let mut session = ExportSession::new();
    for id in ids {
        session.select(*id);
    }
    session
}

#[test]
fn test_single_field_without_filters() {
    let catalog = FormFixtures::catalog("single_field.json");
    let documents = render(&catalog, &selecting(&["Q1"]));

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].role, DocumentRole::Single);
    insta::assert_snapshot!(&documents[0].contents, @r###"
    "Name"
    "${(answers.Q1)!""}"
    "###);
}

#[test]
fn test_single_template_follows_selection_order() {
    let catalog = FormFixtures::catalog("work_order.json");
    let mut session = selecting(&["Hours", "Customer Name", "Q1_1"]);
    session.add_filter(FilterCriterion::new("Q1", Operator::Equals, "Open"));
    session.add_filter(
        FilterCriterion::new("Comments", Operator::Contains, "urgent")
            .with_connective(Connective::Or),
    );

    let documents = render(&catalog, &session);
    insta::assert_snapshot!(&documents[0].contents, @r###"
    "Hours Worked","Customer","Status again"
    <#if answers.Q1 == "Open" OR answers.Comments CONTAINS("urgent")>
    "${(answers.Hours)!""}","${(answers.CustomerName)!""}","${(answers.Q1)!""}"
    </#if>
    "###);
}

#[test]
fn test_repeating_selection_splits() {
    let catalog = FormFixtures::catalog("items.json");
    let documents = render(&catalog, &selecting(&["R1"]));

    let roles: Vec<_> = documents.iter().map(|d| d.role).collect();
    assert_eq!(roles, vec![DocumentRole::Main, DocumentRole::Repeating]);

    insta::assert_snapshot!(without_bom(&documents[0]), @r###"
    SubmissionID,FormName,SubmissionDate
    "${(submission.id)!""}","${(form.name)!""}","${(submission.date)!""}"
    "###);
    insta::assert_snapshot!(without_bom(&documents[1]), @r###"
    SubmissionID,SectionName,RowNumber,"Item [Items]"
    <#list answers.Items as row>
    "${(submission.id)!""}","Items","${row?counter}","${(row.R1)!""}"
    </#list>
    "###);
}

#[test]
fn test_split_documents_filter_independently() {
    let catalog = FormFixtures::catalog("work_order.json");
    let mut session = selecting(&["Hours", "PartNo", "Qty"]);
    session.add_filter(FilterCriterion::new("Qty", Operator::NotEquals, "0"));
    session.add_filter(FilterCriterion::new("Hours", Operator::Exists, ""));

    let documents = render(&catalog, &session);
    insta::assert_snapshot!(without_bom(&documents[0]), @r###"
    SubmissionID,FormName,SubmissionDate,"Hours Worked"
    <#if HAS_CONTENT(answers.Hours)>
    "${(submission.id)!""}","${(form.name)!""}","${(submission.date)!""}","${(answers.Hours)!""}"
    </#if>
    "###);
    insta::assert_snapshot!(without_bom(&documents[1]), @r###"
    SubmissionID,SectionName,RowNumber,"Part Number [Parts]","Quantity [Parts]"
    <#list answers.Parts as row>
    <#if row.Qty != "0">
    "${(submission.id)!""}","Parts","${row?counter}","${(row.PartNo)!""}","${(row.Qty)!""}"
    </#if>
    </#list>
    <#list answers.Tools as row>
    "${(submission.id)!""}","Tools","${row?counter}"
    </#list>
    "###);
}

#[test]
fn test_split_mode_with_nothing_repeating_selected() {
    let catalog = FormFixtures::catalog("work_order.json");
    let mut session = selecting(&["Q1"]);
    session.mode = TemplateMode::Split;

    let documents = render(&catalog, &session);
    let repeating = without_bom(&documents[1]);
    assert!(repeating.starts_with("SubmissionID,SectionName,RowNumber\n"));
    assert_eq!(repeating.matches("<#list ").count(), 2);
}

#[test]
fn test_sole_not_exists_criterion() {
    let catalog = FormFixtures::catalog("single_field.json");
    let criteria = [FilterCriterion::new("Q1", Operator::NotExists, "")
        .with_connective(Connective::Or)];
    assert_eq!(
        compile_filter(&criteria, &catalog, FieldScope::Record),
        "NOT(HAS_CONTENT(answers.Q1))"
    );
}

#[test]
fn test_empty_selection_renders_empty_single_document() {
    let catalog = FormFixtures::catalog("work_order.json");
    let documents = render(&catalog, &ExportSession::new());
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].contents, "");
    assert_eq!(single_template(&[], ""), "");
}

#[test]
fn test_rendering_is_deterministic() {
    let catalog = FormFixtures::catalog("work_order.json");
    let mut session = ExportSession::new();
    session.select_all(&catalog);
    assert_eq!(render(&catalog, &session), render(&catalog, &session));
}

fn repeating_form(sections: usize) -> serde_json::Value {
    let sections: Vec<_> = (0..sections)
        .map(|i| {
            json!({
                "name": format!("Section {}", i),
                "type": "Repeat",
                "rows": [{"pages": [{"sections": [{"answers": [
                    {"id": format!("R{}", i), "name": "Row value"}
                ]}]}]}]
            })
        })
        .collect();
    json!({"pages": [{"name": "P1", "sections": sections}]})
}

proptest! {
    #[test]
    fn prop_one_iteration_block_per_section(sections in 0usize..12, select in any::<bool>()) {
        let catalog = build_catalog(&repeating_form(sections), &ExtractOptions::default());
        prop_assert_eq!(catalog.sections.len(), sections);

        let mut session = ExportSession::new();
        session.mode = TemplateMode::Split;
        if select {
            session.select_all(&catalog);
        }

        let documents = render(&catalog, &session);
        let repeating = &documents[1].contents;
        prop_assert_eq!(repeating.matches("<#list ").count(), sections);
        prop_assert_eq!(repeating.matches("</#list>").count(), sections);
    }
}
