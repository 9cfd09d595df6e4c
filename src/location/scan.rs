//! Streaming scan over the members of a JSON object.
//!
//! Members are handed to a callback one at a time, in document order, as raw
//! token spans borrowed from the input buffer. No document tree is built, so a
//! body that breaks off halfway still yields every member parsed before the
//! break.

use std::fmt;
use std::ops::ControlFlow;

use serde::de::{self, MapAccess, Visitor};
use serde_json::value::RawValue;

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// The closing brace of the object was reached
    Complete,
    /// The callback asked to stop
    Aborted,
    /// The input stopped being a well-formed object (the message says where)
    Invalid(String),
}

/// Scans the direct members of the JSON object at the start of `body`.
///
/// `visit` receives each key and the raw span of its value (strings keep their
/// quotes, escapes are left untouched). Returning `ControlFlow::Break` stops
/// the scan and yields [`ScanStatus::Aborted`]. Bytes after the closing brace
/// are not inspected.
pub fn scan_object<'a, F>(body: &'a [u8], visit: F) -> ScanStatus
where
    F: FnMut(&str, &'a RawValue) -> ControlFlow<()>,
{
    let mut aborted = false;
    let visitor = MemberVisitor {
        visit,
        aborted: &mut aborted,
    };
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let result = de::Deserializer::deserialize_map(&mut deserializer, visitor);

    match result {
        Ok(()) => ScanStatus::Complete,
        Err(_) if aborted => ScanStatus::Aborted,
        Err(e) => ScanStatus::Invalid(e.to_string()),
    }
}

/// Returns the raw token with one leading and one trailing `"` removed.
///
/// No unescaping happens: `"a\"b"` yields `a\"b`. Non-string tokens carry no
/// quotes and come back unchanged.
pub fn string_slice(raw: &RawValue) -> &str {
    let text = raw.get();
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Parses a raw token as a finite JSON number.
///
/// Quoted numbers, `null` and out-of-range values are rejected.
pub fn finite_number(raw: &RawValue) -> Option<f64> {
    serde_json::from_str::<f64>(raw.get())
        .ok()
        .filter(|value| value.is_finite())
}

struct MemberVisitor<'s, F> {
    visit: F,
    aborted: &'s mut bool,
}

impl<'de, F> Visitor<'de> for MemberVisitor<'_, F>
where
    F: FnMut(&str, &'de RawValue) -> ControlFlow<()>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(mut self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            let value: &'de RawValue = map.next_value()?;
            if (self.visit)(&key, value).is_break() {
                *self.aborted = true;
                return Err(de::Error::custom("scan aborted by caller"));
            }
        }
        Ok(())
    }
}
