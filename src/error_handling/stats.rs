//! Lookup statistics tracking.
//!
//! This module provides thread-safe counters for the error kinds reported through
//! outbound error events during a lookup run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorKind;

/// Thread-safe lookup statistics tracker.
///
/// Tracks one atomic counter per [`ErrorKind`]. All kinds are initialized to
/// zero on creation, so lookups never miss.
pub struct LookupStats {
    errors: HashMap<ErrorKind, AtomicUsize>,
}

impl LookupStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for kind in ErrorKind::iter() {
            errors.insert(kind, AtomicUsize::new(0));
        }
        LookupStats { errors }
    }

    /// Increment the counter of an error kind.
    pub fn increment_error(&self, kind: ErrorKind) {
        if let Some(counter) = self.errors.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                kind
            );
        }
    }

    /// Current count for an error kind.
    pub fn get_error_count(&self, kind: ErrorKind) -> usize {
        self.errors
            .get(&kind)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of all error counters.
    pub fn total_errors(&self) -> usize {
        self.errors
            .values()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }
}

impl Default for LookupStats {
    fn default() -> Self {
        Self::new()
    }
}
