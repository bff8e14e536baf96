//! Form definition loading
//!
//! This module provides `FormLoader` - a utility for loading a form definition from a file,
//! raw bytes, or a string, decoding it, and running field extraction on it. It is used by the
//! CLI and by tests.
//!
//! # Example
//!
//! ```rust
//! use ftlgen_parser::form::loader::FormLoader;
//! use ftlgen_parser::form::extraction::ExtractOptions;
//!
//! let catalog = FormLoader::from_path("form.json")?
//!     .catalog(&ExtractOptions::default())?;
//! ```
//!
//! Undecodable input (not UTF-8, not JSON) is an error. A document that decodes but contains
//! nothing recognisable is not: it produces an empty catalog.

use super::extraction::{build_catalog, ExtractOptions};
use super::model::FieldCatalog;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Error that can occur when loading form definitions
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("form definition is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("form definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Form definition source with extraction shortcuts
pub struct FormLoader {
    source: Vec<u8>,
}

impl FormLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let source = fs::read(path)?;
        Ok(FormLoader { source })
    }

    /// Load from raw bytes, as received from an upload
    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        FormLoader {
            source: bytes.into(),
        }
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        FormLoader {
            source: source.into().into_bytes(),
        }
    }

    /// Decode the source into a JSON tree
    pub fn parse(&self) -> Result<Value, LoadError> {
        let text = String::from_utf8(self.source.clone())?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        Ok(serde_json::from_str(text)?)
    }

    /// Decode and extract a uniquely identified field catalog
    pub fn catalog(&self, options: &ExtractOptions) -> Result<FieldCatalog, LoadError> {
        let doc = self.parse()?;
        Ok(build_catalog(&doc, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string_extracts() {
        let catalog = FormLoader::from_string(
            r#"{"pages":[{"name":"P1","sections":[{"answers":[{"id":"Q1","name":"Name"}]}]}]}"#,
        )
        .catalog(&ExtractOptions::default())
        .unwrap();

        assert_eq!(catalog.main.len(), 1);
        assert_eq!(catalog.main[0].path, "answers.Q1");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = FormLoader::from_string("{not json").parse();
        assert!(matches!(result, Err(LoadError::Json(_))));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let result = FormLoader::from_bytes(vec![0x7b, 0xff, 0xfe, 0x7d]).parse();
        assert!(matches!(result, Err(LoadError::Utf8(_))));
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        let doc = FormLoader::from_string("\u{feff}{\"sections\": []}")
            .parse()
            .unwrap();
        assert!(doc.get("sections").is_some());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = FormLoader::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_unrecognised_document_is_empty_not_error() {
        let catalog = FormLoader::from_string("[1, 2, 3]")
            .catalog(&ExtractOptions::default())
            .unwrap();
        assert!(catalog.is_empty());
    }
}
