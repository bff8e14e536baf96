//! Error types for template formats

/// Errors raised while selecting or running a format
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// No format registered under this name
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The format exists but cannot perform the requested operation
    #[error("{0}")]
    NotSupported(String),
    /// The payload format was asked to render without a sample document
    #[error("payload template requested but the session has no sample payload")]
    MissingPayload,
}
