//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available template formats.
//! Formats can be registered and retrieved by name.

use crate::error::FormatError;
use crate::format::{Format, TemplateDocument};
use crate::session::ExportSession;
use ftlgen_parser::form::FieldCatalog;
use std::collections::HashMap;

/// Registry of template formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let documents = registry.render(&catalog, &session, "csv")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Render the session with the named format
    pub fn render(
        &self,
        catalog: &FieldCatalog,
        session: &ExportSession,
        format: &str,
    ) -> Result<Vec<TemplateDocument>, FormatError> {
        self.get(format)?.render(catalog, session)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::csv::CsvFormat);
        registry.register(crate::formats::payload::PayloadFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
