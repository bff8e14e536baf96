//! Shared fixtures for tests across the workspace
//!
//! Form definitions used by tests live in `ftlgen-parser/tests/fixtures`, one file per
//! document shape. Load them by file name:
//!
//! ```rust
//! use ftlgen_parser::testing::FormFixtures;
//!
//! let catalog = FormFixtures::catalog("work_order.json");
//! ```

use crate::form::extraction::{build_catalog, ExtractOptions};
use crate::form::model::FieldCatalog;
use serde_json::Value;
use std::path::PathBuf;

pub struct FormFixtures;

impl FormFixtures {
    pub fn path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    pub fn source(name: &str) -> String {
        let path = Self::path(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
    }

    pub fn document(name: &str) -> Value {
        serde_json::from_str(&Self::source(name))
            .unwrap_or_else(|e| panic!("fixture {} is not valid JSON: {}", name, e))
    }

    /// Extracted and identity-resolved catalog for a fixture.
    pub fn catalog(name: &str) -> FieldCatalog {
        build_catalog(&Self::document(name), &ExtractOptions::default())
    }
}
