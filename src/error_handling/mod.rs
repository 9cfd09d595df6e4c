//! Error handling and lookup statistics.
//!
//! This module provides:
//! - Error type definitions (synchronous node errors, transport errors,
//!   initialization errors)
//! - Error kinds carried by outbound error events
//! - Lookup statistics tracking
//! - Transport error categorization for logs

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_transport_error;
pub use stats::LookupStats;
pub use types::{ErrorKind, InitializationError, NodeError, TransportError};
