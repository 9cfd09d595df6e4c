//! Error type definitions.
//!
//! This module defines the synchronous error types returned to callers and the
//! asynchronous error kinds carried by outbound error events.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors reported synchronously by a location node.
///
/// These propagate to whoever delivered the trigger. Failures discovered while
/// decoding a response are never returned this way; they become
/// [`ErrorKind`]-tagged error events instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Options are incompatible, or a query URL could not be composed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Owned storage for the endpoint could not be allocated.
    #[error("Out of memory while copying the endpoint")]
    OutOfMemory,

    /// The transport could not create the request.
    #[error("Could not create HTTP request: {0}")]
    TransportUnavailable(String),

    /// The request could not be tracked; it was cancelled immediately.
    #[error("Failed to keep pending request: {0}")]
    ResourceExhausted(String),

    /// The inbound packet does not carry the expected payload.
    #[error("Invalid packet: expected {expected}, got {actual}")]
    InvalidPacket {
        expected: &'static str,
        actual: &'static str,
    },

    /// The node has been closed and no longer accepts triggers.
    #[error("Node is closed")]
    NodeClosed,
}

/// Errors reported by a [`Transport`](crate::transport::Transport) when a request
/// cannot be created.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be built (e.g. the URL does not parse).
    #[error("Failed to build request for {url}: {source}")]
    Build {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The transport is not able to accept requests.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

impl From<TransportError> for NodeError {
    fn from(error: TransportError) -> Self {
        NodeError::TransportUnavailable(error.to_string())
    }
}

/// Kinds of failures reported through outbound error events.
///
/// Each of these is terminal for the request it belongs to; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// No response object: connection refused, DNS failure, timeout, cancellation
    RemoteUnreachable,
    /// The service answered with a status other than 200
    RemoteStatus,
    /// The service answered with an empty body
    EmptyResponse,
    /// `latitude` or `longitude` was present but not a finite number
    MalformedCoordinate,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RemoteUnreachable => "Remote unreachable",
            ErrorKind::RemoteStatus => "Remote status error",
            ErrorKind::EmptyResponse => "Empty response",
            ErrorKind::MalformedCoordinate => "Malformed coordinate",
        }
    }
}

impl serde::Serialize for ErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
