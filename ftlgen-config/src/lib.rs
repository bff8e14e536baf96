//! Shared configuration loader for the ftlgen toolchain.
//!
//! `defaults/ftlgen.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`FtlgenConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use ftlgen_babel::{DocumentRole, TemplateMode};
use ftlgen_parser::form::ExtractOptions;
use ftlgen_parser::payload::SampleOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/ftlgen.default.toml");

/// Top-level configuration consumed by ftlgen applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FtlgenConfig {
    pub extraction: ExtractionConfig,
    pub templates: TemplatesConfig,
    pub payload: PayloadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub max_depth: usize,
}

/// Template mode and output file names.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    pub mode: TemplateMode,
    pub single_file_name: String,
    pub main_file_name: String,
    pub repeating_file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadConfig {
    pub example_max_chars: usize,
    pub file_name: String,
}

impl FtlgenConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_depth: self.extraction.max_depth,
        }
    }

    pub fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            max_depth: self.extraction.max_depth,
            example_max_chars: self.payload.example_max_chars,
        }
    }

    /// Output file name for a rendered document.
    pub fn file_name(&self, role: DocumentRole) -> &str {
        match role {
            DocumentRole::Single => &self.templates.single_file_name,
            DocumentRole::Main => &self.templates.main_file_name,
            DocumentRole::Repeating => &self.templates.repeating_file_name,
            DocumentRole::Payload => &self.payload.file_name,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FtlgenConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FtlgenConfig, ConfigError> {
    Loader::new().build()
}
