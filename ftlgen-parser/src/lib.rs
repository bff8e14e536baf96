//! Field extraction for semi-structured form definitions
//!
//!     A form definition is a nested JSON tree of pages, sections, and answers, with an optional
//!     repeating-section construct whose rows share one layout. There is no fixed schema: the
//!     same concepts show up as arrays or mappings, under `pages`, `dataRecord.pages`, or
//!     straight at the root.
//!
//!     This crate turns such a document into a [`FieldCatalog`](form::FieldCatalog): a flat,
//!     deterministic list of addressable fields split into record-scoped ("main") and
//!     row-scoped ("repeating") fields, plus the registry of repeating sections.
//!
//!     The file structure:
//!     .
//!     ├── form
//!     │   ├── loader.rs           # bytes/file/string → JSON tree
//!     │   ├── extraction.rs       # root-shape matchers
//!     │   ├── extraction
//!     │   │   ├── page.rs         # page + repeating section classification
//!     │   │   ├── section.rs      # answer resolution
//!     │   │   ├── fallback.rs     # recursive search for unknown shapes
//!     │   │   └── values.rs
//!     │   ├── identity.rs         # unique id assignment
//!     │   ├── model.rs
//!     │   └── query.rs            # search / summary
//!     ├── payload
//!     │   └── sampling.rs         # sample document → leaf paths
//!     └── testing.rs
//!
//!     This is a pure lib: no printing, no environment, no filesystem access outside of the
//!     explicit loader entry points.

pub mod form;
pub mod payload;
pub mod testing;

pub use form::{build_catalog, Field, FieldCatalog, FieldScope, FormLoader, RepeatingSection};
