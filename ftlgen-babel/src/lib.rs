//! Export template compilation for ftlgen field catalogs
//!
//!     This crate turns a [`FieldCatalog`](ftlgen_parser::form::FieldCatalog) plus the user's
//!     choices (an [`ExportSession`]) into template text for a FreeMarker-style engine.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for every template kind
//!     - FormatRegistry: discovery and selection of formats by name
//!     - ExportSession: selection, filters, template mode, payload mapping
//!     - FilterCompiler: criteria → one boolean expression
//!     - Format implementations: `csv` (single or main + repeating) and `payload`
//!
//!     This is a pure lib: it powers ftlgen-cli but is shell agnostic. No code here prints,
//!     reads env vars, or touches the filesystem. Formats are pure functions of
//!     `(catalog, session)`.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── filter.rs               # Filter expression compiler
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── session.rs              # Export session state
//!     ├── formats
//!     │   ├── cells.rs            # Shared cell / directive syntax
//!     │   ├── csv
//!     │   │   ├── mod.rs          # Single template + mode selection
//!     │   │   └── split.rs        # Main + repeating pair
//!     │   └── payload
//!     │       └── mod.rs
//!     ├── lib.rs
//!
//! Testing
//!     tests
//!     ├── templates.rs            # End-to-end from fixture forms
//!     └── payload.rs

pub mod error;
pub mod filter;
pub mod format;
pub mod formats;
pub mod registry;
pub mod session;

pub use error::FormatError;
pub use filter::{compile_filter, FilterCompiler};
pub use format::{DocumentRole, Format, TemplateDocument};
pub use registry::FormatRegistry;
pub use session::{
    Connective, ExportSession, FilterCriterion, Operator, PayloadBinding, PayloadMapping,
    TemplateMode,
};
