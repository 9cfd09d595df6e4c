//! Main application modules.
//!
//! This module provides event output, shutdown handling and statistics printing
//! used by the lookup run and the binary.

pub mod output;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use output::{format_event, print_event};
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_error_statistics, print_summary};
