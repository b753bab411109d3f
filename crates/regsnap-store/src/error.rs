/// Errors from registry store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key does not exist.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The caller may not open or read the key.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Any other failure reported by the store.
    #[error("store fault at {path}: {reason}")]
    Fault { path: String, reason: String },

    /// I/O error from the underlying access API.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for failures that mean "this key cannot be opened"
    /// rather than "the store is broken".
    pub fn is_unopenable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::AccessDenied(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
