//! Failures raised by the session engine.
//!
//! Each variant's `Display` is the exact line shown to the user, including
//! the client's numeric message code.

use std::io;

use thiserror::Error;

/// Errors reported by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `open` was issued while a connection is established.
    #[error("903 Supplied command not expected at this time")]
    AlreadyConnected,
    /// An operation needing a connection ran without one.
    #[error("903 Supplied command not expected at this time")]
    NotConnected,
    /// Resolving or connecting to the server failed.
    #[error("920 Control connection to {host} on port {port} failed to open")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    /// Reading or writing the control connection failed.
    #[error("925 Control connection I/O error, closing control connection")]
    Stream(#[source] io::Error),
    /// The server closed the stream before the reply was complete.
    #[error("925 Control connection I/O error, closing control connection")]
    StreamClosed,
}

impl SessionError {
    /// Returns true when the error leaves the connection unusable.
    #[must_use]
    pub const fn closes_connection(&self) -> bool {
        matches!(self, Self::Stream(_) | Self::StreamClosed)
    }
}

impl From<io::Error> for SessionError {
    fn from(source: io::Error) -> Self {
        Self::Stream(source)
    }
}
