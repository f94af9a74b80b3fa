//! Bidirectional field-naming convention translation.
//!
//! The persistence side of the system speaks snake_case, the review surface
//! speaks camelCase. This module converts single keys and whole nested
//! JSON trees between the two, plus the segment-specific wire helpers for
//! payloads whose offsets may arrive under alternate key pairs.

use serde_json::{Map, Value};

/// Convert a snake_case key to camelCase.
///
/// Each word after the first is capitalized and concatenated; the first
/// word is kept as-is.
///
/// # Examples
///
/// ```
/// use medanon_core::naming::snake_to_camel;
///
/// assert_eq!(snake_to_camel("start_time"), "startTime");
/// assert_eq!(snake_to_camel("patient_first_name"), "patientFirstName");
/// assert_eq!(snake_to_camel("id"), "id");
/// ```
pub fn snake_to_camel(key: &str) -> String {
    let mut parts = key.split('_');
    let mut out = String::with_capacity(key.len());

    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            for c in chars {
                out.extend(c.to_lowercase());
            }
        }
    }
    out
}

/// Convert a camelCase key to snake_case.
///
/// # Examples
///
/// ```
/// use medanon_core::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("startTime"), "start_time");
/// assert_eq!(camel_to_snake("patientFirstName"), "patient_first_name");
/// assert_eq!(camel_to_snake("id"), "id");
/// ```
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively convert every map key in a JSON tree from snake_case to
/// camelCase.
///
/// Maps and arrays are recursed into; scalars pass through unchanged, so
/// `Value::Null`, numbers, booleans, and strings come back as given.
pub fn normalize_keys(value: Value) -> Value {
    map_keys(value, &snake_to_camel)
}

/// Inverse of [`normalize_keys`]: camelCase keys back to snake_case.
pub fn denormalize_keys(value: Value) -> Value {
    map_keys(value, &camel_to_snake)
}

fn map_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (convert(&k), map_keys(v, convert)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| map_keys(v, convert)).collect())
        }
        scalar => scalar,
    }
}

/// Resolve a wire segment's offsets, whichever key pair it uses.
///
/// Producers emit either `start_time`/`end_time` or the older
/// `segment_start`/`segment_end` pair. The first pair present wins.
/// Returns `None` when neither pair is complete.
pub fn segment_offsets_from_wire(payload: &Map<String, Value>) -> Option<(f64, f64)> {
    for (start_key, end_key) in [("start_time", "end_time"), ("segment_start", "segment_end")] {
        if let (Some(start), Some(end)) = (
            payload.get(start_key).and_then(Value::as_f64),
            payload.get(end_key).and_then(Value::as_f64),
        ) {
            return Some((start, end));
        }
    }
    None
}

/// Build the snake_case wire payload for a segment offset update.
///
/// Extra fields are merged in after denormalization, so callers may pass
/// them in camelCase.
pub fn segment_update_payload(start_offset: f64, end_offset: f64, extra: Option<Value>) -> Value {
    let mut payload = Map::new();
    payload.insert("start_offset".into(), start_offset.into());
    payload.insert("end_offset".into(), end_offset.into());

    if let Some(Value::Object(extra)) = extra.map(denormalize_keys) {
        for (k, v) in extra {
            payload.insert(k, v);
        }
    }
    Value::Object(payload)
}
