//! The location node: query dispatch, completion handling and lifecycle.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{
    NodeOptions, MAX_QUERY_URL_LENGTH, NODE_OPTIONS_API_VERSION, QUERY_PATH_SEGMENT,
};
use crate::error_handling::NodeError;
use crate::transport::{HttpResponse, Transport};

use super::decode::decode_response;
use super::pending::PendingRequests;
use super::types::{LocationEvent, RequestId, Trigger};

/// Channel the node sends its outbound events on.
pub type EventSender = mpsc::UnboundedSender<LocationEvent>;

/// Outcome of one request, delivered back to the node that issued it.
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub outcome: Option<HttpResponse>,
}

/// Composes `{endpoint}/json/{address}`.
///
/// The address is used verbatim; an absent address asks the service about the
/// caller's own IP.
///
/// # Errors
///
/// Returns [`NodeError::InvalidConfiguration`] when the URL would not fit in
/// [`MAX_QUERY_URL_LENGTH`] bytes.
pub fn build_query_url(endpoint: &str, address: Option<&str>) -> Result<String, NodeError> {
    let mut url = String::new();
    write!(
        url,
        "{}/{}/{}",
        endpoint,
        QUERY_PATH_SEGMENT,
        address.unwrap_or("")
    )
    .map_err(|e| NodeError::InvalidConfiguration(e.to_string()))?;

    if url.len() >= MAX_QUERY_URL_LENGTH {
        return Err(NodeError::InvalidConfiguration(format!(
            "query URL is {} bytes, limit is {}",
            url.len(),
            MAX_QUERY_URL_LENGTH
        )));
    }
    Ok(url)
}

/// A geolocation stage of a reactive pipeline.
///
/// Triggers issue requests through the [`Transport`]; each request runs as its
/// own task and reports back through an internal channel. The node itself is
/// only ever driven from one task (see [`spawn_node`](super::spawn_node)), so
/// its pending table needs no locking.
pub struct LocationNode {
    endpoint: String,
    transport: Arc<dyn Transport>,
    pending: PendingRequests,
    events: EventSender,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    closed: bool,
}

impl LocationNode {
    /// Opens a node.
    ///
    /// # Errors
    ///
    /// - [`NodeError::InvalidConfiguration`] if `options` were built for another
    ///   API version or carry an empty endpoint
    /// - [`NodeError::OutOfMemory`] if the endpoint cannot be copied
    pub fn open(
        options: &NodeOptions,
        transport: Arc<dyn Transport>,
        events: EventSender,
    ) -> Result<Self, NodeError> {
        if options.api_version != NODE_OPTIONS_API_VERSION {
            return Err(NodeError::InvalidConfiguration(format!(
                "options API version {} is not supported (expected {})",
                options.api_version, NODE_OPTIONS_API_VERSION
            )));
        }
        if options.endpoint.is_empty() {
            return Err(NodeError::InvalidConfiguration(
                "endpoint must not be empty".to_string(),
            ));
        }

        let mut endpoint = String::new();
        endpoint
            .try_reserve_exact(options.endpoint.len())
            .map_err(|_| NodeError::OutOfMemory)?;
        endpoint.push_str(&options.endpoint);

        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        log::debug!("Opened location node for {}", endpoint);

        Ok(Self {
            endpoint,
            transport,
            pending: PendingRequests::with_capacity(options.max_pending),
            events,
            completions_tx,
            completions_rx,
            closed: false,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of requests issued and not yet completed or cancelled.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Handles an inbound trigger.
    ///
    /// # Errors
    ///
    /// Propagates payload extraction errors for [`Trigger::ResolveAddress`] and
    /// every error of [`resolve`](Self::resolve).
    pub fn process(&mut self, trigger: &Trigger) -> Result<RequestId, NodeError> {
        match trigger {
            Trigger::ResolveSelf => self.resolve(None),
            Trigger::ResolveAddress(packet) => {
                let address = packet.as_str()?;
                self.resolve(Some(address))
            }
        }
    }

    /// Issues a lookup for `address`, or for the caller's own IP when `None`.
    ///
    /// Schedules exactly one request and returns its id; events follow once the
    /// request completes. Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`NodeError::NodeClosed`] after [`close`](Self::close)
    /// - [`NodeError::InvalidConfiguration`] if the URL cannot be composed
    /// - [`NodeError::TransportUnavailable`] if the transport refuses the request
    /// - [`NodeError::ResourceExhausted`] if the request cannot be tracked; it is
    ///   cancelled before returning
    pub fn resolve(&mut self, address: Option<&str>) -> Result<RequestId, NodeError> {
        if self.closed {
            return Err(NodeError::NodeClosed);
        }

        let url = build_query_url(&self.endpoint, address).map_err(|e| {
            log::warn!("Could not prepare endpoint: {}", e);
            e
        })?;
        let request = self.transport.get(&url).map_err(|e| {
            log::warn!("Could not create HTTP request: {}", e);
            NodeError::from(e)
        })?;

        let id = self.pending.next_id();
        let completions = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = request.await;
            // The receiver is gone only once the node has been dropped
            let _ = completions.send(Completion { id, outcome });
        });

        if let Err(e) = self.pending.insert(id, task.abort_handle()) {
            log::warn!("Failed to keep pending request: {}", e);
            task.abort();
            return Err(e);
        }

        log::debug!("Request {} issued: GET {}", id, url);
        Ok(id)
    }

    /// Waits for the next request to complete.
    ///
    /// Cancel safe: a completion is never lost when the returned future is
    /// dropped before it resolves.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Decodes a completed request and emits its events.
    pub fn on_completion(&mut self, completion: Completion) {
        if self.closed {
            log::debug!("Discarding request {} completed after close", completion.id);
            return;
        }
        if !self.pending.remove(completion.id) {
            log::warn!("Failed to find pending request {}", completion.id);
        }

        for event in decode_response(completion.outcome.as_ref()) {
            self.emit(event);
        }
    }

    fn emit(&self, event: LocationEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Event receiver dropped, discarding event");
        }
    }

    /// Cancels every pending request and releases the endpoint.
    ///
    /// Returns the number of requests cancelled. Idempotent; later triggers fail
    /// with [`NodeError::NodeClosed`].
    pub fn close(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.closed = true;
        let cancelled = self.pending.cancel_all();
        let endpoint = std::mem::take(&mut self.endpoint);
        log::debug!(
            "Closed location node for {} ({} pending requests cancelled)",
            endpoint,
            cancelled
        );
        cancelled
    }
}

impl Drop for LocationNode {
    fn drop(&mut self) {
        self.close();
    }
}
