//! Mapping from response keys to decoder actions.

use super::types::{Location, OutputPort};

/// Coordinate a numeric field is stored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Stores `value` into the matching coordinate of `location`.
    pub fn store(self, location: &mut Location, value: f64) {
        match self {
            Axis::Latitude => location.latitude = value,
            Axis::Longitude => location.longitude = value,
        }
    }
}

/// What the decoder does with the value of a known key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    /// Emit the value as a string on the given port
    Emit(OutputPort),
    /// Parse the value as a float and store it into the location
    Coordinate(Axis),
}

/// Known response keys, in the order the service documents them.
pub static FIELD_TABLE: &[(&str, FieldAction)] = &[
    ("ip", FieldAction::Emit(OutputPort::Ip)),
    ("country_name", FieldAction::Emit(OutputPort::CountryName)),
    ("country_code", FieldAction::Emit(OutputPort::CountryCode)),
    ("city", FieldAction::Emit(OutputPort::CityName)),
    ("zip_code", FieldAction::Emit(OutputPort::ZipCode)),
    ("time_zone", FieldAction::Emit(OutputPort::Timezone)),
    ("latitude", FieldAction::Coordinate(Axis::Latitude)),
    ("longitude", FieldAction::Coordinate(Axis::Longitude)),
];

/// Looks up the action for a response key. Matching is exact and case-sensitive.
pub fn field_action(key: &str) -> Option<FieldAction> {
    FIELD_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, action)| *action)
}
