//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorKind, LookupStats};

/// Prints a one-line summary of a lookup run.
pub fn print_summary(requested: usize, events: usize, failed: usize, elapsed_seconds: f64) {
    info!(
        "Resolved {} address{} ({} events, {} failed) in {:.1}s",
        requested,
        if requested == 1 { "" } else { "es" },
        events,
        failed,
        elapsed_seconds
    );
}

/// Prints the per-kind error counts to the log.
pub fn print_error_statistics(error_stats: &LookupStats) {
    let total_errors = error_stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for kind in ErrorKind::iter() {
        let count = error_stats.get_error_count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}
