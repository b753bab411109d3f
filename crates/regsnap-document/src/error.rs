//! Error types for the document crate.

use std::path::PathBuf;

/// Errors that can occur while encoding, decoding, or storing documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A tree or report could not be encoded or written out.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The input is not a well-formed regsnap document.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The document file could not be read or written.
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for document results.
pub type DocumentResult<T> = Result<T, DocumentError>;
