//! Location data structures.
//!
//! This module defines the inbound triggers a location node reacts to and the
//! outbound events it produces.

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::config::ERROR_EVENT_CODE;
use crate::error_handling::{ErrorKind, NodeError};

/// Identifier of one in-flight request, unique per node.
pub type RequestId = u64;

/// Dedicated string output ports, one per well-known response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutputPort {
    Ip,
    CountryName,
    CountryCode,
    CityName,
    ZipCode,
    Timezone,
}

impl OutputPort {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputPort::Ip => "IP",
            OutputPort::CountryName => "COUNTRY_NAME",
            OutputPort::CountryCode => "COUNTRY_CODE",
            OutputPort::CityName => "CITY_NAME",
            OutputPort::ZipCode => "ZIP_CODE",
            OutputPort::Timezone => "TIMEZONE",
        }
    }
}

impl std::fmt::Display for OutputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OutputPort {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Geographic location produced by a successful decode.
///
/// Every coordinate starts as NaN. Altitude stays NaN: the service does not
/// report one, and serializes as `null`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Location {
    /// A location with every coordinate unset.
    pub const fn unset() -> Self {
        Self {
            latitude: f64::NAN,
            longitude: f64::NAN,
            altitude: f64::NAN,
        }
    }

    /// Whether both latitude and longitude hold finite values.
    pub fn is_complete(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unset()
    }
}

/// Payload of an outbound error event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEvent {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorEvent {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// errno-style code of the error packet.
    pub fn code(&self) -> i32 {
        ERROR_EVENT_CODE
    }
}

/// Events emitted by a location node.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LocationEvent {
    /// A string-valued field, sent on its dedicated port
    Field { port: OutputPort, value: String },
    /// The composite location, sent only when both coordinates are valid
    Location(Location),
    /// A failure of one request
    Error(ErrorEvent),
}

impl LocationEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, LocationEvent::Error(_))
    }
}

/// Payload carried by an inbound packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Empty,
    Boolean(bool),
    Float(f64),
    String(String),
}

impl Packet {
    fn type_name(&self) -> &'static str {
        match self {
            Packet::Empty => "empty",
            Packet::Boolean(_) => "boolean",
            Packet::Float(_) => "float",
            Packet::String(_) => "string",
        }
    }

    /// Extracts the string payload.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InvalidPacket`] when the packet carries anything else.
    pub fn as_str(&self) -> Result<&str, NodeError> {
        match self {
            Packet::String(value) => Ok(value),
            other => Err(NodeError::InvalidPacket {
                expected: "string",
                actual: other.type_name(),
            }),
        }
    }
}

impl From<&str> for Packet {
    fn from(value: &str) -> Self {
        Packet::String(value.to_string())
    }
}

impl From<String> for Packet {
    fn from(value: String) -> Self {
        Packet::String(value)
    }
}

/// Inbound triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Resolve the caller's own IP; any payload is ignored
    ResolveSelf,
    /// Resolve the address carried by the packet, which must be a string
    ResolveAddress(Packet),
}
