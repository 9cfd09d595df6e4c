//! Response decoding.
//!
//! Turns the outcome of one geolocation request into the ordered list of
//! outbound events it produces. Decoding is pure: the node forwards the events,
//! this module only decides them.

use std::ops::ControlFlow;

use crate::config::{HTTP_STATUS_OK, SERVICE_NAME};
use crate::error_handling::ErrorKind;
use crate::transport::HttpResponse;

use super::fields::{field_action, FieldAction};
use super::scan::{finite_number, scan_object, string_slice, ScanStatus};
use super::types::{ErrorEvent, Location, LocationEvent};

/// Decodes the outcome of a request into outbound events.
///
/// - No response: one `RemoteUnreachable` error.
/// - Empty body: one `EmptyResponse` error, whatever the status.
/// - Status other than 200: one `RemoteStatus` error.
/// - Otherwise the body's members are scanned in order. Known string fields are
///   emitted as they are met; `latitude` and `longitude` are collected, and a
///   single location event follows the scan when both are valid. A coordinate
///   that is not a finite number stops the scan and adds one
///   `MalformedCoordinate` error; fields emitted before it are kept.
///
/// A body that stops being well-formed JSON is not an error: whatever was
/// scanned before that point is emitted.
pub fn decode_response(outcome: Option<&HttpResponse>) -> Vec<LocationEvent> {
    let Some(response) = outcome else {
        return vec![error_event(
            ErrorKind::RemoteUnreachable,
            format!("Error while reaching {}", SERVICE_NAME),
        )];
    };

    if response.body.is_empty() {
        return vec![error_event(
            ErrorKind::EmptyResponse,
            format!("Empty response from {}", SERVICE_NAME),
        )];
    }

    if response.status != HTTP_STATUS_OK {
        return vec![error_event(
            ErrorKind::RemoteStatus,
            format!(
                "{} returned an unknown response code: {}",
                SERVICE_NAME, response.status
            ),
        )];
    }

    decode_body(&response.body)
}

/// Scans a non-empty response body.
fn decode_body(body: &[u8]) -> Vec<LocationEvent> {
    let mut events = Vec::new();
    let mut location = Location::unset();

    let status = scan_object(body, |key, value| match field_action(key) {
        Some(FieldAction::Emit(port)) => {
            events.push(LocationEvent::Field {
                port,
                value: string_slice(value).to_string(),
            });
            ControlFlow::Continue(())
        }
        Some(FieldAction::Coordinate(axis)) => match finite_number(value) {
            Some(number) => {
                axis.store(&mut location, number);
                ControlFlow::Continue(())
            }
            None => {
                log::debug!("Invalid {} value in {} response: {}", key, SERVICE_NAME, value);
                ControlFlow::Break(())
            }
        },
        None => {
            log::debug!("Unknown key in {} response: {}. Ignoring.", SERVICE_NAME, key);
            ControlFlow::Continue(())
        }
    });

    match status {
        ScanStatus::Aborted => {
            events.push(error_event(
                ErrorKind::MalformedCoordinate,
                format!("Error while parsing location from {}", SERVICE_NAME),
            ));
            return events;
        }
        ScanStatus::Invalid(reason) => {
            log::debug!("{} response scan stopped early: {}", SERVICE_NAME, reason);
        }
        ScanStatus::Complete => {}
    }

    if location.is_complete() {
        events.push(LocationEvent::Location(location));
    }
    events
}

fn error_event(kind: ErrorKind, message: String) -> LocationEvent {
    LocationEvent::Error(ErrorEvent::new(kind, message))
}
