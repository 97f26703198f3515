//! Builds a lesson timetable from semester details and the chapter list.

use chrono::{Datelike, NaiveDate};
use serde_json::json;
use std::collections::HashSet;
use thiserror::Error;

use super::types::{ChapterDetails, Entry, EntryKind, SemesterDetails};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    #[error("Semester end date {end} is before start date {start}")]
    EndBeforeStart { start: String, end: String },
}

/// Parses the date part of an ISO-8601 date or timestamp.
fn parse_date(value: &str) -> Result<NaiveDate, GenerateError> {
    value
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| GenerateError::InvalidDate {
            value: value.to_string(),
        })
}

/// Lays out one entry per day from semester start to end (inclusive).
///
/// Holidays win over teaching days. Teaching days take subtopics in chapter
/// order and become vacant once the subtopics run out; all remaining days
/// are non-teaching.
pub fn generate(
    semester: &SemesterDetails,
    chapters: &[ChapterDetails],
) -> Result<Vec<Entry>, GenerateError> {
    let start = parse_date(&semester.semester_start_date)?;
    let end = parse_date(&semester.semester_end_date)?;
    if end < start {
        return Err(GenerateError::EndBeforeStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let holidays = semester
        .holidays
        .iter()
        .filter(|h| !h.trim().is_empty())
        .map(|h| parse_date(h))
        .collect::<Result<HashSet<_>, _>>()?;

    let mut subtopics = chapters
        .iter()
        .flat_map(|c| c.subtopics.iter().map(move |s| format!("{}: {}", c.chapter_name, s)));

    let timetable = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|day| {
            let date = day.format("%Y-%m-%d").to_string();
            let weekday = day.weekday().to_string().to_lowercase();

            if holidays.contains(&day) {
                Entry::new(date, EntryKind::Holiday, json!("No classes"))
            } else if semester.teaching_days.get(&weekday).copied().unwrap_or(false) {
                match subtopics.next() {
                    Some(topic) => Entry::new(date, EntryKind::Lecture, json!(topic)),
                    None => Entry::new(date, EntryKind::Vacant, json!("No topics scheduled")),
                }
            } else {
                Entry::new(date, EntryKind::NonTeaching, json!("No classes"))
            }
        })
        .collect();

    Ok(timetable)
}
