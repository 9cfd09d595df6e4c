//! HTTP transport abstraction.
//!
//! The location node only needs one capability from HTTP: "send a GET and later
//! learn the response, or learn that there is none". This module defines that
//! seam as the [`Transport`] trait and ships a `reqwest`-backed implementation.
//!
//! Requests are driven as futures. Cancelling a request means dropping (or
//! aborting the task that polls) its future, which is safe at any point and
//! never blocks.

mod http;

use futures::future::BoxFuture;

use crate::error_handling::TransportError;

pub use http::HttpTransport;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Future resolving to the outcome of one request.
///
/// `None` signals a transport-level failure (connection refused, DNS failure,
/// timeout): no response object exists.
pub type ResponseFuture = BoxFuture<'static, Option<HttpResponse>>;

/// Capability to issue HTTP GET requests.
pub trait Transport: Send + Sync {
    /// Prepares a GET request for `url` without custom headers.
    ///
    /// The returned future performs the request when polled and resolves exactly
    /// once.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the request cannot be created at all.
    fn get(&self, url: &str) -> Result<ResponseFuture, TransportError>;
}
