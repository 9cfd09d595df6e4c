//! Bookkeeping of in-flight requests.

use std::collections::HashMap;

use tokio::task::AbortHandle;

use crate::error_handling::NodeError;

use super::types::RequestId;

/// In-flight requests of one node, keyed by request id.
///
/// Owned by the node's event loop; never shared across tasks, so no locking.
pub struct PendingRequests {
    requests: HashMap<RequestId, AbortHandle>,
    capacity: usize,
    next_id: RequestId,
}

impl PendingRequests {
    /// Creates an empty table accepting at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            requests: HashMap::new(),
            capacity,
            next_id: 0,
        }
    }

    /// Reserves the id the next request will be registered under.
    pub fn next_id(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Registers an in-flight request.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::ResourceExhausted`] when the table is full or cannot
    /// grow. The handle is not stored in that case; cancelling it is up to the
    /// caller.
    pub fn insert(&mut self, id: RequestId, handle: AbortHandle) -> Result<(), NodeError> {
        if self.requests.len() >= self.capacity {
            return Err(NodeError::ResourceExhausted(format!(
                "{} requests already pending",
                self.requests.len()
            )));
        }
        self.requests
            .try_reserve(1)
            .map_err(|e| NodeError::ResourceExhausted(e.to_string()))?;
        self.requests.insert(id, handle);
        Ok(())
    }

    /// Removes a request, returning whether it was present.
    pub fn remove(&mut self, id: RequestId) -> bool {
        self.requests.remove(&id).is_some()
    }

    /// Aborts every pending request and empties the table.
    ///
    /// Returns how many requests were cancelled. Aborting never blocks.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.requests.len();
        for (_, handle) in self.requests.drain() {
            handle.abort();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
