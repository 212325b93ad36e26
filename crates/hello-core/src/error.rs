//! Error types for hello-core

use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for hello-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Startup and configuration errors
///
/// Nothing on the request path returns these; an unmatched route is a 404,
/// not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Listener could not be bound (port in use, permission denied, ...)
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// `hostname:port` did not parse as a socket address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// A fixed payload failed to serialize
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A header value contained bytes not allowed on the wire
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
