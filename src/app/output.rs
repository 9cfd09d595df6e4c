//! Event output for the command-line binary.

use colored::*;

use crate::config::LogFormat;
use crate::location::LocationEvent;

/// Renders one event as a single line.
///
/// `Json` yields the serde representation of the event; `Plain` yields a short
/// human-readable line, colored when stdout supports it.
pub fn format_event(event: &LocationEvent, format: &LogFormat) -> String {
    match format {
        LogFormat::Json => serde_json::to_string(event).unwrap_or_else(|e| {
            log::warn!("Failed to serialize event: {}", e);
            String::new()
        }),
        LogFormat::Plain => match event {
            LocationEvent::Field { port, value } => {
                format!("{:<13} {}", port.as_str().cyan(), value)
            }
            LocationEvent::Location(location) => format!(
                "{:<13} {}, {}",
                "LOCATION".green(),
                location.latitude,
                location.longitude
            ),
            LocationEvent::Error(error) => format!(
                "{:<13} [{}] {} (code {})",
                "ERROR".red(),
                error.kind,
                error.message,
                error.code()
            ),
        },
    }
}

/// Prints one event to stdout.
pub fn print_event(event: &LocationEvent, format: &LogFormat) {
    println!("{}", format_event(event, format));
}
