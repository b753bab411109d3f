use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown hive: {0:?}")]
    UnknownHive(String),

    #[error("invalid registry path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
