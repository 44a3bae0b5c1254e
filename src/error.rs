//! Error types for termset.
//!
//! Every fallible operation in the crate returns [`Result`]. Failures raised
//! by an index implementation travel through the materializer untouched, so
//! callers see exactly what the index reported.

use thiserror::Error;

/// The main error type for termset operations.
#[derive(Error, Debug)]
pub enum TermsetError {
    /// I/O errors surfaced by a storage layer beneath an index.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors reported by an index implementation (term dictionaries, postings).
    #[error("Index error: {0}")]
    Index(String),

    /// Invalid argument errors.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TermsetError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        TermsetError::Index(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TermsetError::InvalidArgument(msg.into())
    }

    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TermsetError::InvalidConfig(msg.into())
    }
}

/// Result type alias for termset operations.
pub type Result<T> = std::result::Result<T, TermsetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TermsetError::invalid_argument("term at position 3 has no field");
        assert_eq!(
            err.to_string(),
            "Invalid argument: term at position 3 has no field"
        );

        let err = TermsetError::index("postings unavailable");
        assert_eq!(err.to_string(), "Index error: postings unavailable");
    }

    #[test]
    fn test_io_error_conversion() {
        fn read() -> Result<()> {
            let io: std::io::Result<()> = Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "short read",
            ));
            io?;
            Ok(())
        }

        match read() {
            Err(TermsetError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
