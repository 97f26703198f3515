/// Request bodies accepted by the API
use serde::Deserialize;
use serde_json::Value;

use crate::timetable::deserialize_present;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTimetableRequest {
    #[serde(default)]
    pub timetable: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    /// The topic being moved. Only checked for presence, so `null` counts;
    /// the entry on `current_date` is what actually gets moved.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub topic: Option<Value>,
    #[serde(rename = "currentDate")]
    pub current_date: Option<String>,
}

/// Returns the value if it is present and non-empty.
pub fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
