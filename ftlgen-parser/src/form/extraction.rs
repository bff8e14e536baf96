//! Field extraction
//!
//!     Form definitions come in several shapes and none of them carries a schema. The root
//!     shape is resolved by trying an ordered list of matchers, first match wins:
//!
//!     1. `pages` is an array
//!     2. `pages` is a mapping (iterated in document order)
//!     3. `dataRecord.pages` is an array or mapping
//!     4. `sections` is an array or mapping at the root (one synthetic "Main Page")
//!     5. anything else: unconstrained recursive search, see [fallback]
//!
//!     Shapes 1-4 go through page extraction ([page]), which distinguishes record-scoped
//!     sections from repeating ones. Answer resolution lives in [section].
//!
//!     Extraction is a pure function of the document: the same document always produces the
//!     same fields in the same order.

mod fallback;
mod page;
mod section;
pub(crate) mod values;

use crate::form::model::FieldCatalog;
use serde::Serialize;
use serde_json::Value;
use values::Collection;

/// Default depth guard for recursive walks.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum nesting followed by the fallback search.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The root layouts recognised by the extractor, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootShape {
    PagesArray,
    PagesMap,
    DataRecordPages,
    RootSections,
    Fallback,
}

impl RootShape {
    /// Resolve the shape of a document.
    pub fn detect(doc: &Value) -> Self {
        matched(doc)
            .map(|(shape, _)| shape)
            .unwrap_or(RootShape::Fallback)
    }

    pub fn description(&self) -> &'static str {
        match self {
            RootShape::PagesArray => "pages → sections → answers",
            RootShape::PagesMap => "pages{} → sections → answers",
            RootShape::DataRecordPages => "dataRecord → pages → sections → answers",
            RootShape::RootSections => "sections → answers",
            RootShape::Fallback => "recursive search",
        }
    }
}

type Matcher = fn(&Value) -> Option<Collection<'_>>;

const MATCHERS: &[(RootShape, Matcher)] = &[
    (RootShape::PagesArray, pages_array),
    (RootShape::PagesMap, pages_map),
    (RootShape::DataRecordPages, data_record_pages),
    (RootShape::RootSections, root_sections),
];

fn pages_array(doc: &Value) -> Option<Collection<'_>> {
    doc.get("pages")
        .and_then(Value::as_array)
        .map(|pages| Collection::Array(pages.as_slice()))
}

fn pages_map(doc: &Value) -> Option<Collection<'_>> {
    doc.get("pages")
        .and_then(Value::as_object)
        .map(Collection::Map)
}

fn data_record_pages(doc: &Value) -> Option<Collection<'_>> {
    Collection::from_value(doc.get("dataRecord").and_then(|record| record.get("pages")))
}

fn root_sections(doc: &Value) -> Option<Collection<'_>> {
    Collection::from_value(doc.get("sections"))
}

fn matched(doc: &Value) -> Option<(RootShape, Collection<'_>)> {
    MATCHERS
        .iter()
        .find_map(|(shape, matcher)| matcher(doc).map(|collection| (*shape, collection)))
}

/// Extract fields without assigning unique ids.
pub fn extract_fields(doc: &Value, options: &ExtractOptions) -> FieldCatalog {
    let mut catalog = FieldCatalog::new();

    let shape = match matched(doc) {
        Some((RootShape::RootSections, sections)) => {
            page::extract_sections(sections, &page::PageInfo::main(), &mut catalog);
            RootShape::RootSections
        }
        Some((shape, pages)) => {
            page::extract_pages(pages, &mut catalog);
            shape
        }
        None => {
            fallback::walk(doc, options.max_depth, &mut catalog);
            RootShape::Fallback
        }
    };

    tracing::debug!(
        ?shape,
        main = catalog.main.len(),
        repeating = catalog.repeating.len(),
        sections = catalog.sections.len(),
        "extracted form fields"
    );
    catalog
}

/// Extract fields and resolve their unique ids.
pub fn build_catalog(doc: &Value, options: &ExtractOptions) -> FieldCatalog {
    let mut catalog = extract_fields(doc, options);
    catalog.resolve_identities();
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_shapes_in_priority_order() {
        assert_eq!(RootShape::detect(&json!({"pages": []})), RootShape::PagesArray);
        assert_eq!(RootShape::detect(&json!({"pages": {}})), RootShape::PagesMap);
        assert_eq!(
            RootShape::detect(&json!({"dataRecord": {"pages": {}}})),
            RootShape::DataRecordPages
        );
        assert_eq!(
            RootShape::detect(&json!({"sections": [], "dataRecord": {}})),
            RootShape::RootSections
        );
        assert_eq!(RootShape::detect(&json!({"other": 1})), RootShape::Fallback);
        assert_eq!(RootShape::detect(&json!([1, 2])), RootShape::Fallback);
    }

    #[test]
    fn test_pages_win_over_sections() {
        let doc = json!({
            "pages": [{"sections": [{"answers": [{"id": "P"}]}]}],
            "sections": [{"answers": [{"id": "S"}]}]
        });
        let catalog = extract_fields(&doc, &ExtractOptions::default());
        assert_eq!(catalog.main.len(), 1);
        assert_eq!(catalog.main[0].raw_id, "P");
    }

    #[test]
    fn test_pages_string_is_not_a_page_collection() {
        let doc = json!({"pages": "none", "sections": [{"answers": [{"id": "S"}]}]});
        assert_eq!(RootShape::detect(&doc), RootShape::RootSections);
    }

    #[test]
    fn test_root_sections_use_main_page() {
        let doc = json!({"sections": {"s1": {"answers": [{"id": "Q1"}]}}});
        let catalog = extract_fields(&doc, &ExtractOptions::default());
        assert_eq!(catalog.main[0].page, "Main Page");
    }

    #[test]
    fn test_build_catalog_assigns_unique_ids() {
        let doc = json!({"sections": [{"answers": [{"id": "Q1"}, {"id": "Q1"}]}]});
        let catalog = build_catalog(&doc, &ExtractOptions::default());
        assert_eq!(catalog.main[0].unique_id.as_deref(), Some("Q1"));
        assert_eq!(catalog.main[1].unique_id.as_deref(), Some("Q1_1"));
    }

    #[test]
    fn test_extract_fields_leaves_unique_ids_unset() {
        let doc = json!({"sections": [{"answers": [{"id": "Q1"}]}]});
        let catalog = extract_fields(&doc, &ExtractOptions::default());
        assert!(catalog.main[0].unique_id.is_none());
    }
}
