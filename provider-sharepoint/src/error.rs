//! Error types for the SharePoint provider

use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

/// SharePoint provider errors
#[derive(Error, Debug)]
pub enum SharePointError {
    /// The REST API answered with a status the operation does not accept
    #[error("SharePoint API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Transport failure below the HTTP status level
    #[error(transparent)]
    Bridge(BridgeError),

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Local filesystem failure while writing a download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote or local path that cannot be mapped safely
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A depth limit outside `-1..=u32::MAX`
    #[error("Invalid max depth {0}: use -1 for unbounded or a non-negative limit")]
    InvalidDepth(i64),

    /// Token acquisition failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The client configuration is unusable
    #[error(transparent)]
    Config(#[from] core_runtime::Error),
}

/// Result type for SharePoint operations
pub type Result<T> = std::result::Result<T, SharePointError>;

impl From<BridgeError> for SharePointError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::HttpStatus { status, body } => SharePointError::Api { status, body },
            BridgeError::Io(e) => SharePointError::Io(e),
            other => SharePointError::Bridge(other),
        }
    }
}
