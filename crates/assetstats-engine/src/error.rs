//! Error types for assetstats-engine.

/// Errors produced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A utility operation failed.
    #[error("{0}")]
    Util(#[from] assetstats_util::error::UtilError),

    /// The accumulated stats could not be serialized.
    #[error("cannot serialize stats for {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },

    /// A stats document could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A stats document is not valid JSON or is not an object.
    #[error("invalid stats document at {path}: {message}")]
    Parse { path: String, message: String },

    /// A host event could not be decoded.
    #[error("invalid host event on line {line}: {source}")]
    Event {
        line: usize,
        source: serde_json::Error,
    },
}
