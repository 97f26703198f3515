use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::{Collection, DocumentStore};
use crate::timetable::Entry;

/// Parses a JSON request body. An empty body parses as `null`.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> std::result::Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(body)
    }
}

/// Returns true for payloads that carry nothing worth saving.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Turns a request body into collection records: arrays contribute their
/// items, anything else becomes a single record.
pub fn into_records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Loads the lesson timetable as typed entries.
pub fn load_entries(store: &dyn DocumentStore) -> Result<Vec<Entry>> {
    store
        .load(Collection::LessonTimetable)?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<Entry>, _>>()
        .map_err(|e| AppError::Storage(format!("Malformed lesson timetable: {}", e)))
}

/// Replaces the lesson timetable with `entries`.
pub fn save_entries(store: &dyn DocumentStore, entries: &[Entry]) -> Result<()> {
    let records = entries
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<Value>, _>>()
        .map_err(|e| AppError::Storage(e.to_string()))?;

    store.save(Collection::LessonTimetable, &records)?;
    Ok(())
}
