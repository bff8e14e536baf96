//! Payload templates rendered through the registry

use ftlgen_babel::{DocumentRole, ExportSession, FormatError, FormatRegistry, PayloadMapping};
use ftlgen_parser::payload::{parse_payload, SampleOptions};
use ftlgen_parser::testing::FormFixtures;

const SAMPLE: &str = r#"{
  "workOrder": {
    "customer": "ACME",
    "hours": 4.5,
    "lines": [{"part": "P-1", "qty": 2}]
  },
  "approved": true
}"#;

#[test]
fn test_payload_through_registry() {
    let catalog = FormFixtures::catalog("work_order.json");
    let leaves = parse_payload(SAMPLE, &SampleOptions::default()).unwrap();

    let mut mapping = PayloadMapping::new(leaves);
    mapping.bind("workOrder.lines[0].qty", "Hours");
    mapping.bind("workOrder.customer", "Customer Name");
    mapping.bind("approved", "Q1");

    let mut session = ExportSession::new();
    session.payload = Some(mapping);

    let documents = FormatRegistry::with_defaults()
        .render(&catalog, &session, "payload")
        .unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].role, DocumentRole::Payload);
    insta::assert_snapshot!(&documents[0].contents, @r###"
    {
      "qty": "${(answers.Hours)!""}",
      "customer": "${(answers.CustomerName)!""}",
      "approved": "${(answers.Q1)!""}"
    }
    "###);
}

#[test]
fn test_unbound_sample_renders_empty_object() {
    let catalog = FormFixtures::catalog("work_order.json");
    let leaves = parse_payload(SAMPLE, &SampleOptions::default()).unwrap();

    let mut session = ExportSession::new();
    session.payload = Some(PayloadMapping::new(leaves));

    let documents = FormatRegistry::with_defaults()
        .render(&catalog, &session, "payload")
        .unwrap();
    assert_eq!(documents[0].contents, "{}\n");
}

#[test]
fn test_payload_without_sample_is_an_error() {
    let catalog = FormFixtures::catalog("work_order.json");
    let result = FormatRegistry::with_defaults().render(&catalog, &ExportSession::new(), "payload");
    assert!(matches!(result, Err(FormatError::MissingPayload)));
}

#[test]
fn test_unknown_format_is_an_error() {
    let catalog = FormFixtures::catalog("work_order.json");
    let result = FormatRegistry::with_defaults().render(&catalog, &ExportSession::new(), "xml");
    match result {
        Err(FormatError::FormatNotFound(name)) => assert_eq!(name, "xml"),
        _ => panic!("Expected FormatNotFound error"),
    }
}
