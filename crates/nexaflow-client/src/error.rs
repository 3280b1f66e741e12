//! Client error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// The upload source could not be opened or stat'ed
    #[error("failed to access file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the file failed while computing its digest
    #[error("failed to hash file {}: {source}", .path.display())]
    Hashing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload or metadata could not be encoded as JSON
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request could not be assembled (bad URL, header or body)
    #[error("failed to build request: {0}")]
    RequestConstruction(#[source] reqwest::Error),

    /// A header value contained characters HTTP does not allow
    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be delivered (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The server answered with a body we could not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Check if this error came from delivering or answering a request
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::InvalidResponse(_)
        )
    }

    /// Check if this error came from reading a local file
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileAccess { .. } | Self::Hashing { .. })
    }

    /// HTTP status code, when the server answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
