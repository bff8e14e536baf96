//! Sample payload flattening
//!
//! The payload mapper works from an arbitrary sample JSON document rather than a form
//! definition. [`sampling`] flattens the sample into addressable leaf paths; compiling the
//! mapped leaves into a template lives in `ftlgen-babel`.

pub mod sampling;

pub use sampling::{
    parse_payload, sample_payload, PayloadError, PayloadKind, PayloadLeaf, SampleOptions,
};
