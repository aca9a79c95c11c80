//! Error types for DDLX.
//!
//! All public APIs return `DdlxResult<T>` — no panics in library code.

use thiserror::Error;

/// Unified error type for all DDLX operations.
#[derive(Debug, Error)]
pub enum DdlxError {
    /// Prompt template could not be produced or rendered
    #[error("prompt render error: {0}")]
    Render(String),

    /// Generation backend failed
    #[error("generation error: {0}")]
    Generation(String),

    /// Diagnostic trace stage failed
    #[error("trace error: {0}")]
    Trace(String),

    /// A stage received a value of the wrong shape
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A batch pass was aborted by a stage failure
    #[error("batch processing failed at record {index} ({stage}): {message}")]
    BatchProcessing {
        index: usize,
        stage: String,
        message: String,
    },

    /// SQL parsing error
    #[error("SQL parse error: {message}\nSQL: {sql}")]
    SqlParse { message: String, sql: String },

    /// Invalid arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for all DDLX operations.
pub type DdlxResult<T> = Result<T, DdlxError>;

impl From<serde_json::Error> for DdlxError {
    fn from(err: serde_json::Error) -> Self {
        DdlxError::Serialization(err.to_string())
    }
}
