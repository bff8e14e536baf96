//! Form definitions: loading, field extraction, and identity resolution
//!
//!     The pipeline is: raw bytes → [`loader`] (decode) → [`extraction`] (walk the tree) →
//!     [`identity`] (unique ids) → [`model::FieldCatalog`]. Everything after decoding is a pure
//!     transformation over in-memory data.

pub mod extraction;
pub mod identity;
pub mod loader;
pub mod model;
pub mod query;

pub use extraction::{build_catalog, extract_fields, ExtractOptions, RootShape};
pub use identity::resolve_identities;
pub use loader::{FormLoader, LoadError};
pub use model::{
    clean_identifier, Field, FieldCatalog, FieldScope, FieldSeed, RepeatingSection,
    CLEAN_ID_MAX_CHARS, REPEAT_MARKER,
};
pub use query::{describe_structure, FormSummary};
