//! Error types for transfers and configuration.

use thiserror::Error;

use crate::items::ItemIdentity;

/// Reasons a transfer was rejected. Both leave every container and the
/// inventory exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// No eligible slot on the receiving side
    #[error("destination full: no room for item {identity:?}")]
    DestinationFull {
        /// Identity that could not be placed
        identity: ItemIdentity,
    },

    /// The clicked entry or slot no longer holds anything
    #[error("source empty: nothing left to move")]
    SourceEmpty,
}

/// Errors from loading or validating a `BrowserConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of the problem
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid { message: message.into() }
    }
}
