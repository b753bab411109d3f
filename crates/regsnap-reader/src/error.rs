//! Error types for the reader crate.

use regsnap_store::StoreError;
use regsnap_types::TypeError;

/// Errors that can occur while reading a tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The root path names no hive, or its key cannot be opened.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Opening or enumerating a key below the root failed.
    #[error("store access failed at {path}: {source}")]
    StoreAccess {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Keys nest deeper than the configured limit.
    #[error("nesting at {path} exceeds the depth limit of {limit}")]
    DepthExceeded { path: String, limit: usize },
}

impl ReadError {
    /// A root string that did not parse, reported against the whole input.
    pub(crate) fn unparsable_root(input: &str, err: TypeError) -> Self {
        let reason = match err {
            TypeError::InvalidPath { reason, .. } => reason,
            TypeError::UnknownHive(hive) => format!("unrecognized hive {hive:?}"),
        };
        Self::InvalidPath {
            path: input.to_string(),
            reason,
        }
    }
}

/// Convenience alias for reader results.
pub type ReadResult<T> = Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_hive_reports_whole_input() {
        let err = ReadError::unparsable_root(
            r"HKEY_BOGUS\Software",
            TypeError::UnknownHive("HKEY_BOGUS".into()),
        );
        match err {
            ReadError::InvalidPath { path, reason } => {
                assert_eq!(path, r"HKEY_BOGUS\Software");
                assert!(reason.contains("HKEY_BOGUS"));
            }
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }

    #[test]
    fn invalid_path_keeps_reason_only() {
        let err = ReadError::unparsable_root(
            "  ",
            TypeError::InvalidPath {
                path: "  ".into(),
                reason: "path must not be empty".into(),
            },
        );
        assert_eq!(err.to_string(), r#"invalid path "  ": path must not be empty"#);
    }
}
