//! Error types for the client binary

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error on the link or a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for this client
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is not recognised
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not reach the host
    #[error("could not connect to {addr} after {attempts} attempts: {source}")]
    Connect {
        addr: String,
        attempts: u32,
        source: std::io::Error,
    },

    /// The host closed the link
    #[error("host closed the link")]
    LinkClosed,

    /// Logging could not be set up
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<tilelink_core::SessionError> for ClientError {
    fn from(e: tilelink_core::SessionError) -> Self {
        match e {
            tilelink_core::SessionError::LinkClosed => ClientError::LinkClosed,
        }
    }
}
