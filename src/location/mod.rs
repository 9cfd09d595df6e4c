//! FreeGeoIP-style location node.
//!
//! This module provides:
//! - The node itself (query dispatch, pending request tracking, lifecycle)
//! - Response decoding into outbound events
//! - The event loop that drives a node on its own task
//!
//! A node issues `GET {endpoint}/json/{address}` for every trigger and emits,
//! per response, one string event for each known field, then one composite
//! location event if both coordinates were valid, or an error event.

mod decode;
mod fields;
mod handle;
mod node;
mod pending;
mod scan;
mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use decode::decode_response;
pub use fields::{field_action, Axis, FieldAction, FIELD_TABLE};
pub use handle::{spawn_node, NodeHandle};
pub use node::{build_query_url, Completion, EventSender, LocationNode};
pub use pending::PendingRequests;
pub use scan::{scan_object, ScanStatus};
pub use types::{ErrorEvent, Location, LocationEvent, OutputPort, Packet, RequestId, Trigger};
