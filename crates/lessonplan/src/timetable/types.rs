/// Types for lesson timetable data
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// The kind of slot a calendar entry occupies.
///
/// Unrecognized values are kept as-is so that a timetable written by a newer
/// client round-trips without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Lecture,
    Holiday,
    NonTeaching,
    Vacant,
    Other(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Lecture => "lecture",
            EntryKind::Holiday => "holiday",
            EntryKind::NonTeaching => "non-teaching",
            EntryKind::Vacant => "vacant",
            EntryKind::Other(s) => s,
        }
    }

    /// Returns true for days on which no teaching normally happens.
    pub fn is_non_teaching(&self) -> bool {
        matches!(self, EntryKind::Holiday | EntryKind::NonTeaching)
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, EntryKind::Vacant)
    }
}

impl From<&str> for EntryKind {
    fn from(value: &str) -> Self {
        match value {
            "lecture" => EntryKind::Lecture,
            "holiday" => EntryKind::Holiday,
            "non-teaching" => EntryKind::NonTeaching,
            "vacant" => EntryKind::Vacant,
            other => EntryKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntryKind::from(s.as_str()))
    }
}

/// Deserializes a field that was present in the input, `null` included, as
/// `Some`. Pair with `#[serde(default)]` so an absent field stays `None`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One calendar day in a lesson timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// ISO-8601 date (`YYYY-MM-DD`), the key of the entry
    pub date: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Topic/subject payload, carried along untouched when the entry moves.
    /// `None` when the key is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Any other fields a client stored on the entry
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn new(date: impl Into<String>, kind: EntryKind, details: impl Into<Option<Value>>) -> Self {
        Self {
            date: date.into(),
            kind,
            details: details.into(),
            status: None,
            extra: Map::new(),
        }
    }
}

/// Semester details record, as saved by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterDetails {
    pub semester_start_date: String,
    pub semester_end_date: String,
    /// Lowercase three-letter weekday (`"mon"`, `"tue"`, ...) to enabled flag
    #[serde(default)]
    pub teaching_days: std::collections::HashMap<String, bool>,
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// Chapter record with its subtopics in teaching order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDetails {
    pub chapter_name: String,
    #[serde(default)]
    pub subtopics: Vec<String>,
}
