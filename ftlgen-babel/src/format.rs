//! Format trait definition
//!
//! This module defines the core Format trait that all template formats implement. A format
//! takes a field catalog plus the user's export session and produces one or more template
//! documents.

use crate::error::FormatError;
use crate::session::ExportSession;
use ftlgen_parser::form::FieldCatalog;
use serde::{Deserialize, Serialize};

/// What a rendered document is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentRole {
    /// One-document CSV export
    Single,
    /// Record-level half of a split export
    Main,
    /// Row-level half of a split export
    Repeating,
    /// JSON-shaped payload template
    Payload,
}

/// One emitted template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub role: DocumentRole,
    pub contents: String,
}

impl TemplateDocument {
    pub fn new(role: DocumentRole, contents: impl Into<String>) -> Self {
        TemplateDocument {
            role,
            contents: contents.into(),
        }
    }
}

/// Trait for template formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn render(
///         &self,
///         catalog: &FieldCatalog,
///         session: &ExportSession,
///     ) -> Result<Vec<TemplateDocument>, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "csv", "payload")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions for emitted documents
    fn file_extensions(&self) -> &[&str] {
        &["ftl"]
    }

    /// Render templates for the session's selection
    ///
    /// Default implementation returns NotSupported error.
    fn render(
        &self,
        _catalog: &FieldCatalog,
        _session: &ExportSession,
    ) -> Result<Vec<TemplateDocument>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support rendering",
            self.name()
        )))
    }
}
