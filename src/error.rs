//! Zone Copy Errors
//!
//! Every failure aborts the entity being processed and, through it, the
//! import of the whole entity type. Nothing here is retried.

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, ZoneCopyError>;

/// Errors that can occur while copying a zone
#[derive(Debug, Error)]
pub enum ZoneCopyError {
    /// The API call could not complete (network, TLS, HTTP status)
    #[error("Transport error calling {action}: {source}")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered a well-formed request with a structured error
    #[error("{action} rejected by API: [{code}] {message} (request id: {request_id})")]
    RemoteRejected {
        action: String,
        code: String,
        message: String,
        request_id: String,
    },

    /// The API answered with a body we could not decode
    #[error("Invalid response for {action}: {message}")]
    InvalidResponse { action: String, message: String },

    /// A source-zone identifier has no counterpart in the target zone
    #[error("Reference not found: {what} ({id})")]
    ReferenceNotFound { what: &'static str, id: String },

    /// A source entity breaks a structural invariant of the rewriter
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ZoneCopyError {
    pub(crate) fn old_origin_name(id: &str) -> Self {
        Self::ReferenceNotFound {
            what: "old origin name",
            id: id.to_string(),
        }
    }

    pub(crate) fn new_origin_id(id: &str) -> Self {
        Self::ReferenceNotFound {
            what: "new origin id",
            id: id.to_string(),
        }
    }
}
